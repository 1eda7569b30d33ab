//! # Bank Listing Templates
//!
//! After the cut files are written, one line per bank is rendered from a
//! template so downstream tooling can instantiate each bank:
//!
//! - `@` expands to the bank file path (`<folder>/cutNNN.hex`).
//! - `%` expands to the next coordinate component, starting with the last
//!   (outermost) dimension and moving inwards.
//! - Every other character is copied verbatim.
//!
//! For example, with shape `2-4` and template `mem_% _% @`, bank 5
//! (coordinate `[1, 2]`) renders as `mem_2 _1 out/cut005.hex`.
//!
//! Templates are parsed once. A template with more `%` than the tensor has
//! dimensions is rejected before any line is rendered.

use std::io::Write;

use crate::decompose::AddressDecomposer;
use crate::error::{ConfigError, HexcutResult};
use crate::output::BankFileNaming;
use crate::tensor::BankId;

/// Placeholder for the bank file path.
pub const FILE_PLACEHOLDER: char = '@';

/// Placeholder for one coordinate component.
pub const COORD_PLACEHOLDER: char = '%';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    BankFile,
    Coordinate,
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Split a template into literals and placeholders.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        for c in raw.chars() {
            let placeholder = match c {
                FILE_PLACEHOLDER => Segment::BankFile,
                COORD_PLACEHOLDER => Segment::Coordinate,
                _ => {
                    literal.push(c);
                    continue;
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(placeholder);
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The template as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of `%` placeholders.
    pub fn coordinate_placeholders(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Coordinate))
            .count()
    }

    /// Check that every `%` has a dimension to consume.
    pub fn check_dimensions(&self, dims: usize) -> Result<(), ConfigError> {
        let used = self.coordinate_placeholders();
        if used > dims {
            return Err(ConfigError::TemplateTooManyPlaceholders {
                template: self.raw.clone(),
                used,
                dims,
            });
        }
        Ok(())
    }
}

/// Renders one template line per bank.
#[derive(Debug)]
pub struct TemplateRenderer<'a> {
    template: Template,
    decomposer: &'a AddressDecomposer,
    naming: &'a BankFileNaming,
}

impl<'a> TemplateRenderer<'a> {
    /// Bind a template to a bank array.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TemplateTooManyPlaceholders`] if the template consumes
    /// more coordinate components than there are dimensions.
    pub fn new(
        template: Template,
        decomposer: &'a AddressDecomposer,
        naming: &'a BankFileNaming,
    ) -> Result<Self, ConfigError> {
        template.check_dimensions(decomposer.shape().size())?;
        Ok(Self {
            template,
            decomposer,
            naming,
        })
    }

    /// Render the line for one bank, without terminator.
    pub fn render(&self, id: BankId) -> HexcutResult<String> {
        let coord = self.decomposer.coordinate_of(id)?;
        let mut components = coord.outermost_first();
        let mut line = String::new();
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::BankFile => {
                    line.push_str(&self.naming.bank_path(id).display().to_string())
                }
                Segment::Coordinate => {
                    // Placeholder count was checked against the dimensions.
                    if let Some(c) = components.next() {
                        line.push_str(&c.to_string());
                    }
                }
            }
        }
        Ok(line)
    }

    /// Render every bank in ascending id order, one line each.
    pub fn render_all<W: Write>(&self, out: &mut W) -> HexcutResult<u64> {
        let mut rendered = 0;
        for id in self.decomposer.shape().bank_ids() {
            writeln!(out, "{}", self.render(id)?)?;
            rendered += 1;
        }
        out.flush()?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CutLayout;
    use crate::placement::PlacementMode;
    use crate::tensor::TensorShape;

    fn decomposer(shape: &str, mode: &str) -> AddressDecomposer {
        let layout = CutLayout::new(
            TensorShape::parse(shape).unwrap(),
            PlacementMode::parse(mode).unwrap(),
            8,
            1,
            false,
        )
        .unwrap();
        AddressDecomposer::new(&layout)
    }

    #[test]
    fn parse_counts_placeholders() {
        let t = Template::parse("@ %-%");
        assert_eq!(t.coordinate_placeholders(), 2);
        assert_eq!(t.as_str(), "@ %-%");
        assert_eq!(Template::parse("no placeholders").coordinate_placeholders(), 0);
    }

    #[test]
    fn coordinates_are_consumed_outermost_first() {
        let d = decomposer("2-4", "@@");
        let naming = BankFileNaming::new("out", 8);
        let r = TemplateRenderer::new(Template::parse("mem_% _% @"), &d, &naming).unwrap();
        assert_eq!(r.render(BankId::new(5)).unwrap(), "mem_2 _1 out/cut005.hex");
    }

    #[test]
    fn fewer_placeholders_than_dimensions_is_fine() {
        let d = decomposer("2-4", "@@");
        let naming = BankFileNaming::new("out", 8);
        let r = TemplateRenderer::new(Template::parse("%"), &d, &naming).unwrap();
        assert_eq!(r.render(BankId::new(7)).unwrap(), "3");
    }

    #[test]
    fn too_many_placeholders_is_rejected() {
        let d = decomposer("2", "@");
        let naming = BankFileNaming::new("out", 2);
        let err = TemplateRenderer::new(Template::parse("@ %-%"), &d, &naming).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TemplateTooManyPlaceholders {
                template: "@ %-%".to_string(),
                used: 2,
                dims: 1,
            }
        );
    }

    #[test]
    fn single_placeholder_single_dimension() {
        let d = decomposer("2", "@");
        let naming = BankFileNaming::new("out", 2);
        let r = TemplateRenderer::new(Template::parse("@ %-"), &d, &naming).unwrap();
        assert_eq!(r.render(BankId::new(0)).unwrap(), "out/cut000.hex 0-");
        assert_eq!(r.render(BankId::new(1)).unwrap(), "out/cut001.hex 1-");
    }

    #[test]
    fn file_placeholder_may_repeat() {
        let d = decomposer("2", "D");
        let naming = BankFileNaming::new("res", 2);
        let r = TemplateRenderer::new(Template::parse("@,@"), &d, &naming).unwrap();
        assert_eq!(r.render(BankId::new(1)).unwrap(), "res/cut001.hex,res/cut001.hex");
    }

    #[test]
    fn render_all_emits_one_line_per_bank() {
        let d = decomposer("2-2", "DD");
        let naming = BankFileNaming::new("o", 4);
        let r = TemplateRenderer::new(Template::parse("%,%"), &d, &naming).unwrap();
        let mut out = Vec::new();
        assert_eq!(r.render_all(&mut out).unwrap(), 4);
        assert_eq!(String::from_utf8(out).unwrap(), "0,0\n0,1\n1,0\n1,1\n");
    }

    #[test]
    fn empty_template_renders_empty_lines() {
        let d = decomposer("2", "D");
        let naming = BankFileNaming::new("o", 2);
        let r = TemplateRenderer::new(Template::parse(""), &d, &naming).unwrap();
        let mut out = Vec::new();
        r.render_all(&mut out).unwrap();
        assert_eq!(out, b"\n\n");
    }
}
