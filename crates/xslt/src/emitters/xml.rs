//! XSLT 1.0 stylesheet producing a hierarchical XML document.

use super::{
    EmitInput, StylesheetEmitter, ValueSource, attribute_markup, close_stylesheet, loop_select,
    open_stylesheet, repetition_path, report_shadowed, value_source,
};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::GenerateError;
use crate::hierarchy::{ComponentNode, FieldRef, Hierarchy, HierarchyNode};
use crate::policy::{
    CURRENCY_ATTRIBUTE, CURRENT_DATE_TIME, DEFAULT_CURRENCY, ValueFormat, missing_note,
    two_decimals,
};
use crate::writer::{
    StylesheetWriter, comment_text, element_name, escape_attr, escape_text, variable_name,
    xpath_literal,
};
use std::collections::HashSet;
use std::fmt;
use xslmap_types::{AttributeSpec, AttributeValue, FieldType, Variable, VariableValue};

pub struct XmlEmitter;

impl StylesheetEmitter for XmlEmitter {
    fn emit(&self, input: &EmitInput<'_>) -> Result<String, GenerateError> {
        let hierarchy = Hierarchy::build(input.mappings);
        report_shadowed(&hierarchy, input.sink);
        let version = input.set.xslt_version_or("1.0");
        log::debug!(
            "Emitting XML stylesheet (XSLT {}) with {} top-level node(s)",
            version,
            hierarchy.roots.len()
        );

        check_variable_references(input);

        let mut w = StylesheetWriter::new(input.options.indent);
        open_stylesheet(&mut w, version, &input.options.namespaces, &[])?;
        w.line(r#"<xsl:output method="xml" indent="yes" encoding="UTF-8"/>"#)?;
        declare_variables(&mut w, &input.set.variables)?;
        w.open(r#"<xsl:template match="/">"#)?;

        let mut renderer = XmlRenderer {
            w: &mut w,
            loops: Vec::new(),
        };
        match input.set.root_element.as_ref().filter(|r| !r.name.trim().is_empty()) {
            Some(root) => {
                let tag = format!("{}{}", element_name(&root.name), attributes(&root.attributes));
                if hierarchy.roots.is_empty() {
                    renderer.w.line(&format!("<{}/>", tag))?;
                } else {
                    renderer.w.open(&format!("<{}>", tag))?;
                    renderer.render_all(&hierarchy.roots)?;
                    renderer.w.close(&format!("</{}>", element_name(&root.name)))?;
                }
            }
            None => renderer.render_all(&hierarchy.roots)?,
        }

        w.close("</xsl:template>")?;
        close_stylesheet(&mut w)?;
        Ok(w.finish())
    }
}

fn attributes(specs: &[AttributeSpec]) -> String {
    specs.iter().map(attribute_markup).collect()
}

fn declare_variables(w: &mut StylesheetWriter, variables: &[Variable]) -> fmt::Result {
    for var in variables {
        let select = match &var.value {
            VariableValue::Literal(value) => xpath_literal(value),
            VariableValue::XPath(expr) => expr.clone(),
        };
        w.line(&format!(
            r#"<xsl:variable name="{}" select="{}"/>"#,
            variable_name(&var.name),
            escape_attr(&select)
        ))?;
    }
    Ok(())
}

fn check_variable_references(input: &EmitInput<'_>) {
    let declared: HashSet<String> = input
        .set
        .variables
        .iter()
        .map(|v| variable_name(&v.name))
        .collect();
    let root_attrs = input.set.root_element.iter().map(|r| (r.name.as_str(), &r.attributes));
    let field_attrs = input
        .mappings
        .iter()
        .map(|m| (m.effective_target_path(), &m.attributes));

    for (owner, attrs) in root_attrs.chain(field_attrs) {
        for attr in attrs {
            if let AttributeValue::Variable(var) = &attr.value {
                if !declared.contains(&variable_name(var)) {
                    input.sink.report(Diagnostic::warning(
                        DiagnosticKind::UnknownVariable,
                        format!(
                            "attribute '{}' on '{}' references undeclared variable '${}'",
                            attr.name, owner, var
                        ),
                    ));
                }
            }
        }
    }
}

struct XmlRenderer<'w> {
    w: &'w mut StylesheetWriter,
    /// Absolute paths of the enclosing `for-each` loops, innermost last.
    loops: Vec<String>,
}

impl XmlRenderer<'_> {
    fn render_all(&mut self, nodes: &[HierarchyNode<'_>]) -> fmt::Result {
        for node in nodes {
            match node {
                HierarchyNode::Component(component) => self.render_component(component)?,
                HierarchyNode::Leaf(leaf) => {
                    for field in &leaf.fields {
                        self.render_field(field)?;
                    }
                }
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

    fn render_component(&mut self, component: &ComponentNode<'_>) -> fmt::Result {
        let name = element_name(&component.name);
        let definition = component.definition.as_ref();
        let attrs = definition
            .map(|d| attributes(&d.mapping.attributes))
            .unwrap_or_default();
        let looped = definition.filter(|d| d.mapping.repeats()).map(repetition_path);

        if let Some(path) = looped.clone() {
            self.open_loop(path)?;
        }
        if component.children.is_empty() {
            self.w.line(&format!("<{}{}/>", name, attrs))?;
        } else {
            self.w.open(&format!("<{}{}>", name, attrs))?;
            self.render_all(&component.children)?;
            self.w.close(&format!("</{}>", name))?;
        }
        if looped.is_some() {
            self.close_loop()?;
        }
        Ok(())
    }

    fn render_field(&mut self, field: &FieldRef<'_>) -> fmt::Result {
        let looped = field.mapping.repeats().then(|| repetition_path(field));
        if let Some(path) = looped.clone() {
            self.open_loop(path)?;
        }

        let name = element_name(field.leaf_name);
        let mut attrs = attributes(&field.mapping.attributes);
        let format = ValueFormat::for_field(field.mapping.field_type);
        let has_currency_attr = field
            .mapping
            .attributes
            .iter()
            .any(|a| a.name == CURRENCY_ATTRIBUTE);
        if format == (ValueFormat::TwoDecimals { currency: true }) && !has_currency_attr {
            attrs.push_str(&format!(r#" {}="{}""#, CURRENCY_ATTRIBUTE, DEFAULT_CURRENCY));
        }

        if field.mapping.field_type == FieldType::Component {
            self.w.line(&format!("<{}{}/>", name, attrs))?;
        } else {
            match value_source(field, &self.loops) {
                ValueSource::Literal("") | ValueSource::Empty => {
                    self.w.line(&format!("<{}{}/>", name, attrs))?;
                }
                ValueSource::Literal(text) => {
                    self.w
                        .line(&format!("<{0}{1}>{2}</{0}>", name, attrs, escape_text(text)))?;
                }
                ValueSource::Select(select) => {
                    self.write_value(field, &name, &attrs, &select, format)?;
                }
            }
        }

        if looped.is_some() {
            self.close_loop()?;
        }
        Ok(())
    }

    fn write_value(
        &mut self,
        field: &FieldRef<'_>,
        name: &str,
        attrs: &str,
        select: &str,
        format: ValueFormat,
    ) -> fmt::Result {
        let sel = escape_attr(select);
        match format {
            ValueFormat::Raw => self.w.line(&format!(
                r#"<{0}{1}><xsl:value-of select="{2}"/></{0}>"#,
                name, attrs, sel
            )),
            ValueFormat::TwoDecimals { .. } => self.w.line(&format!(
                r#"<{0}{1}><xsl:value-of select="{2}"/></{0}>"#,
                name,
                attrs,
                escape_attr(&two_decimals(select))
            )),
            ValueFormat::DateWithFallback => {
                self.w.open(&format!("<{}{}>", name, attrs))?;
                self.w.open("<xsl:choose>")?;
                self.w.line(&format!(
                    r#"<xsl:when test="{0}"><xsl:value-of select="{0}"/></xsl:when>"#,
                    sel
                ))?;
                self.w.line(&format!(
                    r#"<xsl:otherwise><xsl:value-of select="{}"/></xsl:otherwise>"#,
                    CURRENT_DATE_TIME
                ))?;
                self.w.close("</xsl:choose>")?;
                self.w.close(&format!("</{}>", name))
            }
            ValueFormat::Text => {
                self.w.open("<xsl:choose>")?;
                self.w.open(&format!(r#"<xsl:when test="{}">"#, sel))?;
                self.w.line(&format!(
                    r#"<{0}{1}><xsl:value-of select="{2}"/></{0}>"#,
                    name, attrs, sel
                ))?;
                self.w.close("</xsl:when>")?;
                self.w.open("<xsl:otherwise>")?;
                self.w.line(&format!(
                    "<xsl:comment>{}</xsl:comment>",
                    escape_text(&comment_text(&missing_note(field.mapping)))
                ))?;
                self.w.close("</xsl:otherwise>")?;
                self.w.close("</xsl:choose>")
            }
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
    use xslmap_types::{Mapping, MappingSet, Namespaces, RootElement};

    fn emit_with(set: &MappingSet, options: &GenerateOptions, sink: &CollectingSink) -> String {
        let prepared = prepare(&set.fields, sink);
        let mappings = complete(&prepared.mappings);
        let input = EmitInput {
            set,
            mappings: &mappings,
            options,
            sink,
        };
        XmlEmitter.emit(&input).unwrap()
    }

    fn emit(set: &MappingSet) -> String {
        emit_with(set, &GenerateOptions::default(), &CollectingSink::new())
    }

    #[test]
    fn test_attribute_source_reads_attribute() {
        let set = MappingSet::new(vec![Mapping::new("Company/Employee/@id", "empId").unwrap()]);
        let out = emit(&set);
        assert!(out.contains(r#"<empId><xsl:value-of select="@id"/></empId>"#));
        assert!(out.contains(r#"<xsl:template match="/">"#));
    }

    #[test]
    fn test_root_element_wraps_hierarchy() {
        let set = MappingSet::new(vec![
            Mapping::new("Company/Name", "Name").unwrap().with_target_path("Org/Name"),
        ])
        .with_root_element(
            RootElement::new("Export").with_attribute(AttributeSpec::hardcoded("version", "2")),
        );
        let out = emit(&set);

        let root = out.find(r#"<Export version="2">"#).unwrap();
        let org = out.find("<Org>").unwrap();
        let name = out.find("<Name>").unwrap();
        let close_org = out.find("</Org>").unwrap();
        let close_root = out.find("</Export>").unwrap();
        assert!(root < org && org < name && name < close_org && close_org < close_root);
    }

    #[test]
    fn test_variables_and_variable_attributes() {
        let set = MappingSet::new(vec![
            Mapping::new("Doc/Title", "Title")
                .unwrap()
                .with_attribute(AttributeSpec::variable("lang", "Lang")),
        ])
        .with_variable(Variable::literal("Lang", "en-US"))
        .with_variable(Variable::xpath("Count", "count(//Item)"));
        let out = emit(&set);

        assert!(out.contains(r#"<xsl:variable name="Lang" select="'en-US'"/>"#));
        assert!(out.contains(r#"<xsl:variable name="Count" select="count(//Item)"/>"#));
        assert!(out.contains(r#"<Title lang="{$Lang}">"#));
    }

    #[test]
    fn test_undeclared_variable_is_reported() {
        let set = MappingSet::new(vec![
            Mapping::new("Doc/Title", "Title")
                .unwrap()
                .with_attribute(AttributeSpec::variable("lang", "Missing")),
        ]);
        let sink = CollectingSink::new();
        emit_with(&set, &GenerateOptions::default(), &sink);
        assert_eq!(sink.count(DiagnosticKind::UnknownVariable), 1);
    }

    #[test]
    fn test_type_formatting() {
        let set = MappingSet::new(vec![
            Mapping::new("Inv/Total", "Total").unwrap().with_field_type(FieldType::Currency),
            Mapping::new("Inv/Rate", "Rate").unwrap().with_field_type(FieldType::Decimal),
            Mapping::new("Inv/Date", "Date").unwrap().with_field_type(FieldType::Date),
            Mapping::new("Inv/At", "At").unwrap().with_field_type(FieldType::Time),
        ]);
        let out = emit(&set);

        assert!(out.contains(
            r#"<Total currencyID="USD"><xsl:value-of select="format-number(//Inv/Total,'0.00')"/></Total>"#
        ));
        assert!(out.contains(r#"<Rate><xsl:value-of select="format-number(//Inv/Rate,'0.00')"/></Rate>"#));
        assert!(out.contains(r#"<xsl:when test="//Inv/Date"><xsl:value-of select="//Inv/Date"/></xsl:when>"#));
        assert!(out.contains(CURRENT_DATE_TIME));
        assert!(out.contains(r#"<At><xsl:value-of select="//Inv/At"/></At>"#));
    }

    #[test]
    fn test_missing_text_annotation() {
        let set = MappingSet::new(vec![
            Mapping::new("A/Req", "Req").unwrap(),
            Mapping::new("A/Opt", "Opt").unwrap().optional(),
        ]);
        let out = emit(&set);
        assert!(out.contains("<xsl:comment>required field 'Req' has no value</xsl:comment>"));
        assert!(out.contains("<xsl:comment>optional field 'Opt' not present</xsl:comment>"));
    }

    #[test]
    fn test_hardcoded_and_empty_values() {
        let set = MappingSet::new(vec![
            Mapping::new("x", "Source").unwrap().with_hardcoded_value("A & B"),
            Mapping::new("x", "Blank").unwrap().with_empty_value(),
        ]);
        let out = emit(&set);
        assert!(out.contains("<Source>A &amp; B</Source>"));
        assert!(out.contains("<Blank/>"));
    }

    #[test]
    fn test_repeated_component_loops_with_relative_children() {
        let set = MappingSet::new(vec![
            Mapping::new("Company/Employee", "Employee")
                .unwrap()
                .with_target_path("Staff/Employee")
                .with_field_type(FieldType::Component)
                .with_occurs(5),
            Mapping::new("Company/Employee/Name", "Name")
                .unwrap()
                .with_target_path("Staff/Employee/Name"),
            Mapping::new("Company/Employee/@id", "id")
                .unwrap()
                .with_target_path("Staff/Employee/id"),
        ]);
        let out = emit(&set);

        assert_eq!(out.matches("<Staff>").count(), 1);
        assert!(out.contains(r#"<xsl:for-each select="//Company/Employee">"#));
        assert!(out.contains(r#"<Name><xsl:value-of select="Name"/></Name>"#));
        assert!(out.contains(r#"<id><xsl:value-of select="@id"/></id>"#));
    }

    #[test]
    fn test_repeated_leaf_iterates_its_own_path() {
        let set = MappingSet::new(vec![
            Mapping::new("Person/Phone", "Phone").unwrap().with_occurs(3),
        ]);
        let out = emit(&set);
        assert!(out.contains(r#"<xsl:for-each select="//Person/Phone">"#));
        assert!(out.contains(r#"<Phone><xsl:value-of select="."/></Phone>"#));
    }

    #[test]
    fn test_for_each_path_overrides_occurs() {
        let set = MappingSet::new(vec![
            Mapping::new("Order/Line/Sku", "Sku")
                .unwrap()
                .with_occurs(2)
                .with_for_each("Order/Line"),
        ]);
        let out = emit(&set);
        assert!(out.contains(r#"<xsl:for-each select="//Order/Line">"#));
        assert!(out.contains(r#"<Sku><xsl:value-of select="Sku"/></Sku>"#));
    }

    #[test]
    fn test_namespaces_are_declared() {
        let set = MappingSet::new(vec![Mapping::new("a", "b").unwrap()]);
        let options = GenerateOptions::default()
            .with_namespaces(Namespaces::new().with("hr", "urn:hr").with("default", "urn:d"));
        let out = emit_with(&set, &options, &CollectingSink::new());
        assert!(out.contains(r#"xmlns:hr="urn:hr""#));
        assert!(out.contains(r#"xmlns="urn:d""#));
        assert!(out.contains(r#"exclude-result-prefixes="hr""#));
    }
}
