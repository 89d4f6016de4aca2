//! XSLT 3.0 stylesheet building a single JSON object with `xsl:map`.

use super::{
    EmitInput, StylesheetEmitter, ValueSource, close_stylesheet, loop_select, open_stylesheet,
    repetition_path, report_shadowed, value_source,
};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::GenerateError;
use crate::generator::JsonValueMode;
use crate::hierarchy::{ComponentNode, FieldRef, Hierarchy, HierarchyNode, LeafNode};
use crate::policy::{CURRENT_DATE_TIME, ValueFormat, two_decimals};
use crate::writer::{StylesheetWriter, escape_attr, xpath_literal};
use std::fmt;

/// Iteration anchor used when the mapping set names no root path.
pub const DEFAULT_JSON_ROOT: &str = "/*[1]";

const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

pub struct JsonEmitter;

impl StylesheetEmitter for JsonEmitter {
    fn emit(&self, input: &EmitInput<'_>) -> Result<String, GenerateError> {
        let hierarchy = Hierarchy::build(input.mappings);
        report_shadowed(&hierarchy, input.sink);
        let root = input.set.root_path().unwrap_or(DEFAULT_JSON_ROOT);
        let mode = input.options.json_values;
        log::debug!(
            "Emitting JSON stylesheet anchored at '{}' ({:?} values)",
            root,
            mode
        );

        let extra: &[(&str, &str)] = match mode {
            JsonValueMode::Typed => &[("xs", XS_NAMESPACE)],
            JsonValueMode::Direct => &[],
        };

        let mut w = StylesheetWriter::new(input.options.indent);
        open_stylesheet(&mut w, "3.0", &input.options.namespaces, extra)?;
        w.line(r#"<xsl:output method="json" indent="yes" encoding="UTF-8"/>"#)?;
        w.open(r#"<xsl:template match="/">"#)?;
        w.open("<xsl:map>")?;
        w.open(&format!(r#"<xsl:for-each select="{}">"#, escape_attr(root)))?;

        let mut renderer = JsonRenderer {
            w: &mut w,
            loops: vec![root.to_string()],
            mode,
            sink: input.sink,
        };
        renderer.render_all(&hierarchy.roots)?;

        w.close("</xsl:for-each>")?;
        w.close("</xsl:map>")?;
        w.close("</xsl:template>")?;
        close_stylesheet(&mut w)?;
        Ok(w.finish())
    }
}

/// `key` attribute value: the name as a quoted string literal.
fn key(name: &str) -> String {
    escape_attr(&xpath_literal(name))
}

/// The type-aware value expression used in [`JsonValueMode::Typed`].
fn typed_expression(select: &str, format: ValueFormat) -> String {
    match format {
        ValueFormat::DateWithFallback => format!(
            "if ({0}) then string({0}) else {1}",
            select, CURRENT_DATE_TIME
        ),
        ValueFormat::TwoDecimals { .. } => format!(
            "if ({0}) then xs:decimal({1}) else ()",
            select,
            two_decimals(select)
        ),
        ValueFormat::Raw => format!("string({})", select),
        ValueFormat::Text => format!("if ({0}) then string({0}) else ()", select),
    }
}

struct JsonRenderer<'w, 's> {
    w: &'w mut StylesheetWriter,
    loops: Vec<String>,
    mode: JsonValueMode,
    sink: &'s dyn DiagnosticSink,
}

impl JsonRenderer<'_, '_> {
    fn render_all(&mut self, nodes: &[HierarchyNode<'_>]) -> fmt::Result {
        for node in nodes {
            match node {
                HierarchyNode::Component(component) => self.render_component(component)?,
                HierarchyNode::Leaf(leaf) => self.render_leaf(leaf)?,
            }
        }
        Ok(())
    }

    fn open_loop(&mut self, path: String) -> fmt::Result {
        let select = loop_select(&path, &self.loops);
        self.w
            .open(&format!(r#"<xsl:for-each select="{}">"#, escape_attr(&select)))?;
        self.loops.push(path);
        Ok(())
    }

    fn close_loop(&mut self) -> fmt::Result {
        self.loops.pop();
        self.w.close("</xsl:for-each>")
    }

    fn drop_attributes(&self, field: &FieldRef<'_>) {
        if !field.mapping.attributes.is_empty() {
            self.sink.report(Diagnostic::warning(
                DiagnosticKind::Unsupported,
                format!(
                    "{} attribute(s) on '{}' have no JSON representation and were dropped",
                    field.mapping.attributes.len(),
                    field.mapping.effective_target_path()
                ),
            ));
        }
    }

    fn annotate_optional(&mut self, field: &FieldRef<'_>) -> fmt::Result {
        if !field.mapping.required && !field.is_placeholder() {
            self.w
                .comment(&format!("optional field '{}'", field.mapping.target_name))?;
        }
        Ok(())
    }

    fn render_component(&mut self, component: &ComponentNode<'_>) -> fmt::Result {
        let definition = component.definition.as_ref();
        if component.is_placeholder() {
            self.w
                .comment(&format!("placeholder container '{}'", component.name))?;
            if component.children.is_empty() {
                return Ok(());
            }
        }
        if let Some(definition) = definition {
            self.annotate_optional(definition)?;
            self.drop_attributes(definition);
        }

        let key = key(&component.name);
        let looped = definition.filter(|d| d.mapping.repeats()).map(repetition_path);

        self.w.open(&format!(r#"<xsl:map-entry key="{}">"#, key))?;
        match looped {
            Some(path) => {
                self.w.open("<xsl:array>")?;
                self.open_loop(path)?;
                self.w.open("<xsl:map>")?;
                self.render_all(&component.children)?;
                self.w.close("</xsl:map>")?;
                self.close_loop()?;
                self.w.close("</xsl:array>")?;
            }
            None => {
                self.w.open("<xsl:map>")?;
                self.render_all(&component.children)?;
                self.w.close("</xsl:map>")?;
            }
        }
        self.w.close("</xsl:map-entry>")
    }

    fn render_leaf(&mut self, leaf: &LeafNode<'_>) -> fmt::Result {
        let Some((field, duplicates)) = leaf.fields.split_first() else {
            return Ok(());
        };
        for duplicate in duplicates {
            self.sink.report(Diagnostic::warning(
                DiagnosticKind::MalformedInput,
                format!(
                    "'{}' maps to key '{}' already produced by '{}' and is not emitted",
                    duplicate.mapping.source_path, leaf.name, field.mapping.source_path
                ),
            ));
        }

        if field.is_placeholder() {
            return self
                .w
                .comment(&format!("placeholder field '{}'", leaf.name));
        }
        self.annotate_optional(field)?;
        self.drop_attributes(field);

        let key = key(&leaf.name);
        if field.mapping.repeats() {
            self.w.open(&format!(r#"<xsl:map-entry key="{}">"#, key))?;
            self.w.open("<xsl:array>")?;
            self.open_loop(repetition_path(field))?;
            let value = self.value_instruction(field);
            self.w.line(&value)?;
            self.close_loop()?;
            self.w.close("</xsl:array>")?;
            return self.w.close("</xsl:map-entry>");
        }

        match value_source(field, &self.loops) {
            ValueSource::Literal(text) => self.w.line(&format!(
                r#"<xsl:map-entry key="{}" select="{}"/>"#,
                key,
                escape_attr(&xpath_literal(text))
            )),
            ValueSource::Empty => self
                .w
                .line(&format!(r#"<xsl:map-entry key="{}" select="''"/>"#, key)),
            ValueSource::Select(select) => match self.mode {
                JsonValueMode::Direct => self.w.line(&format!(
                    r#"<xsl:map-entry key="{}"><xsl:value-of select="{}"/></xsl:map-entry>"#,
                    key,
                    escape_attr(&select)
                )),
                JsonValueMode::Typed => {
                    let format = ValueFormat::for_field(field.mapping.field_type);
                    self.w.line(&format!(
                        r#"<xsl:map-entry key="{}" select="{}"/>"#,
                        key,
                        escape_attr(&typed_expression(&select, format))
                    ))
                }
            },
        }
    }

    /// The instruction producing one member of a repeated value.
    fn value_instruction(&self, field: &FieldRef<'_>) -> String {
        match value_source(field, &self.loops) {
            ValueSource::Literal(text) => format!(
                r#"<xsl:sequence select="{}"/>"#,
                escape_attr(&xpath_literal(text))
            ),
            ValueSource::Empty => r#"<xsl:sequence select="''"/>"#.to_string(),
            ValueSource::Select(select) => match self.mode {
                JsonValueMode::Direct => {
                    format!(r#"<xsl:value-of select="{}"/>"#, escape_attr(&select))
                }
                JsonValueMode::Typed => format!(
                    r#"<xsl:sequence select="{}"/>"#,
                    escape_attr(&typed_expression(
                        &select,
                        ValueFormat::for_field(field.mapping.field_type)
                    ))
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::generator::GenerateOptions;
    use crate::hierarchy::complete;
    use crate::prepare::prepare;
    use xslmap_types::{AttributeSpec, FieldType, Mapping, MappingSet};

    fn emit_with(set: &MappingSet, options: &GenerateOptions, sink: &CollectingSink) -> String {
        let prepared = prepare(&set.fields, sink);
        let mappings = complete(&prepared.mappings);
        let input = EmitInput {
            set,
            mappings: &mappings,
            options,
            sink,
        };
        JsonEmitter.emit(&input).unwrap()
    }

    fn emit(set: &MappingSet) -> String {
        emit_with(set, &GenerateOptions::default(), &CollectingSink::new())
    }

    #[test]
    fn test_single_top_level_map_anchored_at_default_root() {
        let set = MappingSet::new(vec![Mapping::new("Company/Name", "name").unwrap()]);
        let out = emit(&set);

        assert!(out.contains(r#"version="3.0""#));
        assert!(out.contains(r#"<xsl:output method="json""#));
        assert!(out.contains(r#"<xsl:for-each select="/*[1]">"#));
        assert!(out.contains(
            r#"<xsl:map-entry key="'name'"><xsl:value-of select="Name"/></xsl:map-entry>"#
        ));
        let map = out.find("<xsl:map>").unwrap();
        let anchor = out.find(r#"<xsl:for-each select="/*[1]">"#).unwrap();
        assert!(map < anchor);
    }

    #[test]
    fn test_explicit_root_path_is_used() {
        let set = MappingSet::new(vec![Mapping::new("Order/Id", "id").unwrap()])
            .with_root_path("/Order");
        let out = emit(&set);
        assert!(out.contains(r#"<xsl:for-each select="/Order">"#));
        assert!(out.contains(r#"<xsl:value-of select="Id"/>"#));
    }

    #[test]
    fn test_nested_maps_and_placeholder_comment() {
        let set = MappingSet::new(vec![
            Mapping::new("Company/Name", "name").unwrap().with_target_path("company/name"),
            Mapping::new("Company/City", "city").unwrap().with_target_path("company/city"),
        ]);
        let out = emit(&set);

        assert!(out.contains("<!-- placeholder container 'company' -->"));
        assert_eq!(out.matches(r#"key="'company'""#).count(), 1);
        assert_eq!(out.matches("<xsl:map>").count(), 2);
    }

    #[test]
    fn test_repeated_component_becomes_array_of_maps() {
        let set = MappingSet::new(vec![
            Mapping::new("Company/Employee", "employees")
                .unwrap()
                .with_field_type(FieldType::Component)
                .with_occurs(10),
            Mapping::new("Company/Employee/@id", "id")
                .unwrap()
                .with_target_path("employees/id"),
        ]);
        let out = emit(&set);

        let array = out.find("<xsl:array>").unwrap();
        let each = out.find(r#"<xsl:for-each select="Employee">"#).unwrap();
        let id = out
            .find(r#"<xsl:map-entry key="'id'"><xsl:value-of select="@id"/></xsl:map-entry>"#)
            .unwrap();
        assert!(array < each && each < id);
    }

    #[test]
    fn test_repeated_leaf_becomes_array() {
        let set = MappingSet::new(vec![
            Mapping::new("Person/Phone", "phones").unwrap().with_occurs(3),
        ]);
        let out = emit(&set);
        assert!(out.contains(r#"<xsl:for-each select="Phone">"#));
        assert!(out.contains(r#"<xsl:value-of select="."/>"#));
    }

    #[test]
    fn test_hardcoded_empty_and_optional() {
        let set = MappingSet::new(vec![
            Mapping::new("x", "source").unwrap().with_hardcoded_value("it's"),
            Mapping::new("x", "blank").unwrap().with_empty_value(),
            Mapping::new("Doc/Note", "note").unwrap().optional(),
        ]);
        let out = emit(&set);
        assert!(out.contains(r#"<xsl:map-entry key="'source'" select="&quot;it's&quot;"/>"#));
        assert!(out.contains(r#"<xsl:map-entry key="'blank'" select="''"/>"#));
        assert!(out.contains("<!-- optional field 'note' -->"));
    }

    #[test]
    fn test_attributes_and_duplicates_are_reported() {
        let set = MappingSet::new(vec![
            Mapping::new("Doc/Title", "title")
                .unwrap()
                .with_attribute(AttributeSpec::hardcoded("lang", "en")),
            Mapping::new("Doc/Heading", "title").unwrap(),
        ]);
        let sink = CollectingSink::new();
        let out = emit_with(&set, &GenerateOptions::default(), &sink);

        assert_eq!(sink.count(DiagnosticKind::Unsupported), 1);
        assert_eq!(sink.count(DiagnosticKind::MalformedInput), 1);
        assert_eq!(out.matches(r#"key="'title'""#).count(), 1);
        assert!(!out.contains("lang"));
    }

    #[test]
    fn test_typed_values() {
        let set = MappingSet::new(vec![
            Mapping::new("Inv/Total", "total").unwrap().with_field_type(FieldType::Currency),
            Mapping::new("Inv/Date", "date").unwrap().with_field_type(FieldType::Date),
        ]);
        let options = GenerateOptions::default().with_json_values(JsonValueMode::Typed);
        let out = emit_with(&set, &options, &CollectingSink::new());

        assert!(out.contains(r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#));
        assert!(out.contains(r#"exclude-result-prefixes="xs""#));
        assert!(out.contains("xs:decimal(format-number(Total,'0.00'))"));
        assert!(out.contains("if (Date) then string(Date) else substring("));
    }
}
