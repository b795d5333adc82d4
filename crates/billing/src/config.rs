//! PDF formatting options.
//!
//! Every option is a closed set with one exhaustive table per enum mapping it
//! to its wire string and its display label.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use billgen_core::{ValidationError, ValueObject};

macro_rules! wire_enum_from_str {
    ($t:ty, $field:literal) => {
        impl FromStr for $t {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        ValidationError::new(
                            $field,
                            format!("must be one of: {}", expected.join(", ")),
                        )
                    })
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Euro,
    Dollar,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Euro, Currency::Dollar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Euro => "euro",
            Currency::Dollar => "dollar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Euro => "Euro",
            Currency::Dollar => "Dollar",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Euro => "€",
            Currency::Dollar => "$",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Gl,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Gl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Gl => "gl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Gl => "Galego",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Latex,
    Times,
}

impl FontStyle {
    pub const ALL: [FontStyle; 2] = [FontStyle::Latex, FontStyle::Times];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Latex => "latex",
            FontStyle::Times => "times",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontStyle::Latex => "Latex",
            FontStyle::Times => "Times New Roman",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4Paper,
    A5Paper,
    B5Paper,
    ExecutivePaper,
    LegalPaper,
    LetterPaper,
}

impl PaperSize {
    pub const ALL: [PaperSize; 6] = [
        PaperSize::A4Paper,
        PaperSize::A5Paper,
        PaperSize::B5Paper,
        PaperSize::ExecutivePaper,
        PaperSize::LegalPaper,
        PaperSize::LetterPaper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::A4Paper => "a4paper",
            PaperSize::A5Paper => "a5paper",
            PaperSize::B5Paper => "b5paper",
            PaperSize::ExecutivePaper => "executivepaper",
            PaperSize::LegalPaper => "legalpaper",
            PaperSize::LetterPaper => "letterpaper",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaperSize::A4Paper => "A4",
            PaperSize::A5Paper => "A5",
            PaperSize::B5Paper => "B5",
            PaperSize::ExecutivePaper => "Executive",
            PaperSize::LegalPaper => "Legal",
            PaperSize::LetterPaper => "Letter",
        }
    }
}

wire_enum_from_str!(Currency, "currency");
wire_enum_from_str!(Language, "language");
wire_enum_from_str!(FontStyle, "font_style");
wire_enum_from_str!(PaperSize, "paper_size");

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Rendering options sent along with a bill request. Always fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfConfig {
    pub currency: Currency,
    pub language: Language,
    pub font_style: FontStyle,
    /// Points; must be positive.
    pub font_size: f64,
    pub paper_size: PaperSize,
    pub landscape: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            language: Language::default(),
            font_style: FontStyle::default(),
            font_size: DEFAULT_FONT_SIZE,
            paper_size: PaperSize::default(),
            landscape: false,
        }
    }
}

impl ValueObject for PdfConfig {}

impl PdfConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.font_size > 0.0) || self.font_size.is_infinite() {
            return Err(ValidationError::new("font_size", "must be > 0"));
        }
        Ok(())
    }
}
