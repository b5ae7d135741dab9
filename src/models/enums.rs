use serde::{Deserialize, Serialize};

use crate::pipeline::resolution::ResolutionError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ResolutionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ResolutionError::Validation(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(ChartKind {
    Bar => "bar",
    Line => "line",
    Pie => "pie",
    Doughnut => "doughnut",
    PolarArea => "polarArea",
    Radar => "radar",
    Scatter => "scatter",
});

str_enum!(LegendPosition {
    Top => "top",
    Bottom => "bottom",
    Left => "left",
    Right => "right",
    ChartArea => "chartArea",
});

impl ChartKind {
    /// Kinds whose datasets are `{x, y}` points rather than per-label numbers.
    /// Point data positions itself, so these kinds never carry labels.
    pub fn uses_points(&self) -> bool {
        matches!(self, Self::Scatter)
    }

    /// Kinds drawn as one segment per category (one colour per value).
    pub fn is_segmented(&self) -> bool {
        matches!(self, Self::Pie | Self::Doughnut | Self::PolarArea)
    }
}

impl Default for LegendPosition {
    fn default() -> Self {
        Self::Top
    }
}
