// Variantmap Generators
// Renders mapping tables as rules-file symbols sections

use std::fmt;
use std::io::Write;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::layout::LayoutToken;
use crate::mapping::{MappingPair, MappingTable};

/// Errors that can occur while generating rules lines
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("unexpected variant: {0}")]
    UnexpectedVariant(String),

    #[error("expected variant: {0}")]
    MissingVariant(String),

    #[error("unsupported want '{0}', expected one of: mls, mlvs")]
    UnsupportedWant(String),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Which kind of rules the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Want {
    /// model, layout => symbols
    Mls,
    /// model, layout, variant => symbols
    Mlvs,
}

impl Want {
    pub fn as_str(&self) -> &'static str {
        match self {
            Want::Mls => "mls",
            Want::Mlvs => "mlvs",
        }
    }
}

impl fmt::Display for Want {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Want {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mls" => Ok(Want::Mls),
            "mlvs" => Ok(Want::Mlvs),
            other => Err(GenerateError::UnsupportedWant(other.to_string())),
        }
    }
}

/// 1-based position of a layout in a multi-layout keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutIndex(NonZeroU32);

impl LayoutIndex {
    /// Zero means "no index" and yields `None`
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(LayoutIndex)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn is_first(self) -> bool {
        self.get() == 1
    }

    /// Symbols prefix: only the first layout pulls in the `pc` base
    fn symbols_base(self) -> &'static str {
        if self.is_first() {
            "pc"
        } else {
            ""
        }
    }

    /// Group suffix, e.g. `:2`; empty for the first layout
    fn group_suffix(self) -> String {
        if self.is_first() {
            String::new()
        } else {
            format!(":{}", self.get())
        }
    }

    /// A target with its own variant is used literally, otherwise the
    /// variant bound to this index is substituted at rules-apply time
    fn target_symbols(self, target: &LayoutToken) -> String {
        if target.has_variant() {
            target.to_string()
        } else {
            format!("{}%(v[{}])", target.base(), self.get())
        }
    }

    fn symbols(self, target: &LayoutToken) -> String {
        format!(
            "{}+{}{}",
            self.symbols_base(),
            self.target_symbols(target),
            self.group_suffix()
        )
    }
}

impl fmt::Display for LayoutIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// What to generate: a want plus an optional layout index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub want: Want,
    pub index: Option<LayoutIndex>,
}

impl GenerationRequest {
    /// Build a request; a `number` of zero is the same as no number
    pub fn new(want: Want, number: Option<u32>) -> Self {
        Self {
            want,
            index: number.and_then(LayoutIndex::new),
        }
    }

    pub fn generator(&self) -> Generator {
        match (self.want, self.index) {
            (Want::Mls, None) => Generator::FixedLayout,
            (Want::Mls, Some(index)) => Generator::LayoutIndexed(index),
            (Want::Mlvs, None) => Generator::FixedLayoutVariant,
            (Want::Mlvs, Some(index)) => Generator::LayoutVariantIndexed(index),
        }
    }
}

/// One of the four symbols section formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// `! model layout = symbols`
    FixedLayout,
    /// `! model layout[n] = symbols`
    LayoutIndexed(LayoutIndex),
    /// `! model layout variant = symbols`
    FixedLayoutVariant,
    /// `! model layout[n] variant[n] = symbols`
    LayoutVariantIndexed(LayoutIndex),
}

impl Generator {
    /// Name of the rules section this generator produces
    pub fn section_name(&self) -> &'static str {
        match self {
            Generator::FixedLayout => "ml_s",
            Generator::LayoutIndexed(_) => "mln_s",
            Generator::FixedLayoutVariant => "mlv_s",
            Generator::LayoutVariantIndexed(_) => "mlnvn_s",
        }
    }

    /// Whether source layouts must carry a variant
    pub fn requires_source_variant(&self) -> bool {
        matches!(
            self,
            Generator::FixedLayoutVariant | Generator::LayoutVariantIndexed(_)
        )
    }

    /// Header line, including the trailing newline
    pub fn header(&self) -> String {
        match self {
            Generator::FixedLayout => "! model\t\tlayout\t\t\t\t=\tsymbols\n".to_string(),
            Generator::LayoutIndexed(n) => format!("! model\t\tlayout[{}]\t=\tsymbols\n", n),
            Generator::FixedLayoutVariant => {
                "! model\t\tlayout\t\tvariant\t\t=\tsymbols\n".to_string()
            }
            Generator::LayoutVariantIndexed(n) => {
                format!("! model\t\tlayout[{}]\tvariant[{}]\t=\tsymbols\n", n, n)
            }
        }
    }

    /// Check that a pair can be rendered by this generator
    pub fn check(&self, pair: &MappingPair) -> Result<(), GenerateError> {
        let source = &pair.source;
        match (self.requires_source_variant(), source.has_variant()) {
            (false, true) => Err(GenerateError::UnexpectedVariant(source.to_string())),
            (true, false) => Err(GenerateError::MissingVariant(source.to_string())),
            _ => Ok(()),
        }
    }

    /// Render one pair as a rules line, including the trailing newline
    pub fn render_pair(&self, pair: &MappingPair) -> Result<String, GenerateError> {
        self.check(pair)?;

        let MappingPair { source, target } = pair;
        // check() guarantees a variant for the variant forms
        let variant = source.variant().unwrap_or_default();

        let line = match self {
            Generator::FixedLayout => format!("  *\t\t{}\t\t\t=\tpc+{}\n", source, target),
            Generator::LayoutIndexed(n) => {
                format!("  *\t\t{}\t\t=\t{}\n", source, n.symbols(target))
            }
            Generator::FixedLayoutVariant => format!(
                "  *\t\t{}\t\t{}\t\t=\tpc+{}\n",
                source.base(),
                variant,
                target
            ),
            Generator::LayoutVariantIndexed(n) => format!(
                "  *\t\t{}\t\t{}\t=\t{}\n",
                source.base(),
                variant,
                n.symbols(target)
            ),
        };

        Ok(line)
    }
}

/// Write one table's rules lines to `dest`, optionally preceded by the header
///
/// Lines are written pair by pair; on error the lines for earlier pairs
/// have already been written.
pub fn write_table<W: Write + ?Sized>(
    dest: &mut W,
    table: &MappingTable,
    generator: Generator,
    write_header: bool,
) -> Result<(), GenerateError> {
    log::debug!(
        "generating {} for {} mapping(s), header={}",
        generator.section_name(),
        table.len(),
        write_header
    );

    if write_header {
        dest.write_all(generator.header().as_bytes())?;
    }

    for pair in table {
        let line = generator.render_pair(pair)?;
        log::trace!("{}: {}", generator.section_name(), line.trim_end());
        dest.write_all(line.as_bytes())?;
    }

    Ok(())
}

/// Render one table into a string
pub fn render_to_string(
    table: &MappingTable,
    generator: Generator,
    write_header: bool,
) -> Result<String, GenerateError> {
    let mut buf = Vec::new();
    write_table(&mut buf, table, generator, write_header)?;
    // Only UTF-8 strings are ever written
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
