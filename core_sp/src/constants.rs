pub const DEFAULT_SERVER_PORT: u16 = 5002;
pub const DEFAULT_SERVER_HOST: [u8; 4] = [127, 0, 0, 1];

/// Separates rows in a submitted grid string
pub const ROW_SEPARATOR: char = '-';
/// Open cell character in a submitted grid string, before normalization
pub const SUBMITTED_OPEN: char = 'o';
/// Separates rows in the stored form of a grid
pub const STORED_ROW_SEPARATOR: &str = ",";
