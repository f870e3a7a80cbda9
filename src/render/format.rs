use crate::foundation::core::Canvas;

/// One entry of the output-format catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OutputFormat {
    pub key: &'static str,
    pub width: u32,
    pub height: u32,
    pub display_name: &'static str,
}

impl OutputFormat {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

pub const SQUARE: OutputFormat = OutputFormat {
    key: "square",
    width: 1080,
    height: 1080,
    display_name: "Square (1:1)",
};

pub const PORTRAIT: OutputFormat = OutputFormat {
    key: "portrait",
    width: 1080,
    height: 1350,
    display_name: "Portrait (4:5)",
};

pub const STORY: OutputFormat = OutputFormat {
    key: "story",
    width: 1080,
    height: 1920,
    display_name: "Story (9:16)",
};

const CATALOGUE: [OutputFormat; 3] = [SQUARE, PORTRAIT, STORY];

/// Every known format, in display order.
pub fn all() -> &'static [OutputFormat] {
    &CATALOGUE
}

pub fn by_key(key: &str) -> Option<OutputFormat> {
    CATALOGUE.iter().copied().find(|f| f.key == key)
}

impl Default for OutputFormat {
    fn default() -> Self {
        SQUARE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/format.rs"]
mod tests;
