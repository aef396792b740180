use serde::Serialize;

/// Type Name Format, the 3 bit record category from the header byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum NdefType {
    Empty,
    WellKnown,
    Mime,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl NdefType {
    /// Only the low 3 bits are looked at
    pub const fn from_bits(tnf: u8) -> Self {
        match tnf & 0b111 {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::Mime,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    pub const fn to_bits(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WellKnown => 1,
            Self::Mime => 2,
            Self::AbsoluteUri => 3,
            Self::External => 4,
            Self::Unknown => 5,
            Self::Unchanged => 6,
            Self::Reserved => 7,
        }
    }
}
