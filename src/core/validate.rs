//! Field validation for item drafts
//!
//! Pure functions: the same raw input always yields the same verdict.

pub const NAME_MAX_LEN: usize = 255;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_TOO_LONG: &str = "Name must be 255 characters or less";
pub const QUANTITY_REQUIRED: &str = "Quantity is required";
pub const QUANTITY_NOT_A_NUMBER: &str = "Quantity must be a number";
pub const QUANTITY_NEGATIVE: &str = "Quantity cannot be negative";

/// An editable item field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Quantity,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Name, Field::Quantity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Quantity => "quantity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Item Name",
            Field::Quantity => "Quantity",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate one field's raw input; `None` means the value is acceptable
pub fn validate(field: Field, raw: &str) -> Option<&'static str> {
    match field {
        Field::Name => validate_name(raw),
        Field::Quantity => parse_quantity(raw).err(),
    }
}

pub fn validate_name(raw: &str) -> Option<&'static str> {
    if raw.trim().is_empty() {
        Some(NAME_REQUIRED)
    } else if raw.chars().count() > NAME_MAX_LEN {
        Some(NAME_TOO_LONG)
    } else {
        None
    }
}

/// Parse a raw quantity into the value sent to the server
///
/// Accepts an optionally signed run of ASCII digits, surrounded by optional
/// whitespace. `-0` is zero.
pub fn parse_quantity(raw: &str) -> Result<u64, &'static str> {
    if raw.is_empty() {
        return Err(QUANTITY_REQUIRED);
    }

    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QUANTITY_NOT_A_NUMBER);
    }

    if negative {
        return if digits.bytes().all(|b| b == b'0') {
            Ok(0)
        } else {
            Err(QUANTITY_NEGATIVE)
        };
    }

    digits.parse::<u64>().map_err(|_| QUANTITY_NOT_A_NUMBER)
}
