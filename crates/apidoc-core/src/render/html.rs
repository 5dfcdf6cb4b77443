//! HTML pages for documented structures

use std::fmt::Write;

use super::markdown;
use super::{relative_root, RenderResult};
use crate::ast::ClassKind;
use crate::context::DocContext;
use crate::phpdoc::PhpDoc;
use crate::structure::{
    ConstantInfo, MethodInfo, ParameterInfo, PropertyInfo, StructureInfo, TemplateInfo,
};
use crate::tree::{NamespaceNode, StructureTree};
use crate::types::VarType;
use crate::util::escape_html;

/// Renders structure pages and the index of one run
pub struct HtmlRenderer<'c> {
    ctx: &'c DocContext,
    tree: &'c StructureTree,
    title: String,
}

impl<'c> HtmlRenderer<'c> {
    #[must_use]
    pub fn new(ctx: &'c DocContext, tree: &'c StructureTree, title: impl Into<String>) -> Self {
        Self {
            ctx,
            tree,
            title: title.into(),
        }
    }

    /// Page of one structure, to be written at its output path
    pub fn render_structure(&self, structure: &StructureInfo) -> RenderResult<String> {
        let page = structure.output_path();
        let doc = structure.doc(self.ctx);
        let mut out = String::new();

        self.write_head(&mut out, structure.name(), &page)?;

        writeln!(out, "<main class=\"content\">")?;
        writeln!(out, "<header>")?;
        if !structure.namespace().is_empty() {
            writeln!(
                out,
                "  <p class=\"namespace\">{}</p>",
                escape_html(structure.namespace())
            )?;
        }
        write!(out, "  <h1><span class=\"kind\">{}</span> ", structure_keywords(structure))?;
        write!(out, "{}", escape_html(structure.basename()))?;
        self.write_templates(&mut out, &page, structure.templates(self.ctx)?)?;
        writeln!(out, "</h1>")?;
        writeln!(out, "</header>")?;

        self.write_hierarchy(&mut out, &page, structure)?;
        write_doc(&mut out, &doc)?;

        let constants = structure.constants(self.ctx)?;
        if !constants.is_empty() {
            let heading = if structure.kind() == ClassKind::Enum {
                "Cases and constants"
            } else {
                "Constants"
            };
            writeln!(out, "<section id=\"constants\">")?;
            writeln!(out, "  <h2>{heading}</h2>")?;
            for constant in constants {
                self.write_constant(&mut out, &page, constant)?;
            }
            writeln!(out, "</section>")?;
        }

        let properties = structure.properties(self.ctx)?;
        if !properties.is_empty() {
            writeln!(out, "<section id=\"properties\">")?;
            writeln!(out, "  <h2>Properties</h2>")?;
            for property in properties {
                self.write_property(&mut out, &page, property)?;
            }
            writeln!(out, "</section>")?;
        }

        let methods = structure.methods(self.ctx)?;
        if !methods.is_empty() {
            writeln!(out, "<section id=\"methods\">")?;
            writeln!(out, "  <h2>Methods</h2>")?;
            for method in methods.values() {
                self.write_method(&mut out, &page, method)?;
            }
            writeln!(out, "</section>")?;
        }

        writeln!(out, "</main>")?;
        write_foot(&mut out)?;
        Ok(out)
    }

    /// `index.html`: every namespace with its structures
    pub fn render_index(&self) -> RenderResult<String> {
        let page = "index.html";
        let mut out = String::new();
        self.write_head(&mut out, &self.title, page)?;

        writeln!(out, "<main class=\"content\">")?;
        writeln!(out, "<header>")?;
        writeln!(out, "  <h1>{}</h1>", escape_html(&self.title))?;
        writeln!(out, "</header>")?;
        self.write_index_node(&mut out, page, self.tree.root())?;
        writeln!(out, "</main>")?;

        write_foot(&mut out)?;
        Ok(out)
    }

    fn write_index_node(&self, out: &mut String, page: &str, node: &NamespaceNode) -> RenderResult<()> {
        for namespace in node.namespaces() {
            self.write_index_node(out, page, namespace)?;
        }
        if node.structures().next().is_none() {
            return Ok(());
        }
        let heading = if node.name().is_empty() {
            "Global namespace".to_string()
        } else {
            escape_html(node.name())
        };
        writeln!(out, "<section>")?;
        writeln!(out, "  <h2>{heading}</h2>")?;
        writeln!(out, "  <dl class=\"structures\">")?;
        for structure in node.structures() {
            writeln!(
                out,
                "    <dt><a href=\"{}\">{}</a> <span class=\"kind\">{}</span></dt>",
                escape_html(&self.href(page, &structure.output_path())),
                escape_html(structure.basename()),
                structure.kind().keyword()
            )?;
            if let Some(summary) = structure.doc(self.ctx).summary() {
                writeln!(out, "    <dd>{}</dd>", escape_html(summary))?;
            }
        }
        writeln!(out, "  </dl>")?;
        writeln!(out, "</section>")?;
        Ok(())
    }

    // ==================== Layout ====================

    fn write_head(&self, out: &mut String, title: &str, page: &str) -> RenderResult<()> {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "  <meta charset=\"UTF-8\">")?;
        writeln!(
            out,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(
            out,
            "  <title>{} - {}</title>",
            escape_html(title),
            escape_html(&self.title)
        )?;
        writeln!(out, "<style>{STYLES}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;

        writeln!(out, "<nav class=\"sidebar\">")?;
        writeln!(out, "  <div class=\"sidebar-header\">")?;
        writeln!(
            out,
            "    <h2><a href=\"{}\">{}</a></h2>",
            escape_html(&self.href(page, "index.html")),
            escape_html(&self.title)
        )?;
        writeln!(out, "  </div>")?;
        self.write_nav(out, page, self.tree.root())?;
        writeln!(out, "</nav>")?;
        Ok(())
    }

    fn write_nav(&self, out: &mut String, page: &str, node: &NamespaceNode) -> RenderResult<()> {
        if node.is_empty() {
            return Ok(());
        }
        writeln!(out, "  <ul>")?;
        for namespace in node.namespaces() {
            writeln!(
                out,
                "    <li class=\"namespace\">{}",
                escape_html(namespace.basename())
            )?;
            self.write_nav(out, page, namespace)?;
            writeln!(out, "    </li>")?;
        }
        for structure in node.structures() {
            let target = structure.output_path();
            let current = if target == page { " class=\"current\"" } else { "" };
            writeln!(
                out,
                "    <li{current}><a href=\"{}\">{}</a></li>",
                escape_html(&self.href(page, &target)),
                escape_html(structure.basename())
            )?;
        }
        writeln!(out, "  </ul>")?;
        Ok(())
    }

    // ==================== Structure ====================

    fn write_hierarchy(
        &self,
        out: &mut String,
        page: &str,
        structure: &StructureInfo,
    ) -> RenderResult<()> {
        let parent = structure.parent(self.ctx)?;
        let interfaces = structure.interfaces(self.ctx)?;
        let traits = structure.traits(self.ctx)?;
        if parent.is_none() && interfaces.is_empty() && traits.is_empty() {
            return Ok(());
        }

        writeln!(out, "<dl class=\"hierarchy\">")?;
        if let Some(parent) = parent {
            write!(out, "  <dt>Extends</dt><dd>")?;
            self.write_type(out, page, parent)?;
            writeln!(out, "</dd>")?;
        }
        if !interfaces.is_empty() {
            let label = if structure.kind() == ClassKind::Interface {
                "Extends"
            } else {
                "Implements"
            };
            write!(out, "  <dt>{label}</dt><dd>")?;
            self.write_list(out, page, interfaces)?;
            writeln!(out, "</dd>")?;
        }
        if !traits.is_empty() {
            write!(out, "  <dt>Uses</dt><dd>")?;
            self.write_list(out, page, traits)?;
            writeln!(out, "</dd>")?;
        }
        writeln!(out, "</dl>")?;
        Ok(())
    }

    fn write_templates(
        &self,
        out: &mut String,
        page: &str,
        templates: &[TemplateInfo],
    ) -> RenderResult<()> {
        if templates.is_empty() {
            return Ok(());
        }
        write!(out, "<span class=\"templates\">&lt;")?;
        for (i, template) in templates.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            if let Some(keyword) = template.variance.keyword() {
                write!(out, "{keyword} ")?;
            }
            write!(out, "<span class=\"template\">{}</span>", escape_html(&template.name))?;
            if let Some(bound) = &template.bound {
                write!(out, " of ")?;
                self.write_type(out, page, bound)?;
            }
            if let Some(default) = &template.default {
                write!(out, " = ")?;
                self.write_type(out, page, default)?;
            }
        }
        write!(out, "&gt;</span>")?;
        Ok(())
    }

    // ==================== Members ====================

    fn write_constant(
        &self,
        out: &mut String,
        page: &str,
        constant: &ConstantInfo,
    ) -> RenderResult<()> {
        writeln!(out, "  <div class=\"item\" id=\"{}\">", constant.id)?;
        write!(out, "    <div class=\"signature\">")?;
        if constant.is_case {
            write!(out, "case {}", escape_html(&constant.name))?;
        } else {
            if constant.is_final {
                write!(out, "final ")?;
            }
            write!(out, "{} const ", constant.visibility.keyword())?;
            if let Some(ty) = &constant.doc_type {
                self.write_type(out, page, ty)?;
                write!(out, " ")?;
            }
            write!(out, "{}", escape_html(&constant.name))?;
        }
        if let Some(value) = &constant.value {
            write!(out, " = {}", escape_html(value))?;
        }
        writeln!(out, "</div>")?;
        write_doc(out, &constant.doc)?;
        writeln!(out, "  </div>")?;
        Ok(())
    }

    fn write_property(
        &self,
        out: &mut String,
        page: &str,
        property: &PropertyInfo,
    ) -> RenderResult<()> {
        writeln!(out, "  <div class=\"item\" id=\"{}\">", property.id)?;
        write!(out, "    <div class=\"signature\">")?;
        if property.is_final {
            write!(out, "final ")?;
        }
        if property.is_abstract {
            write!(out, "abstract ")?;
        }
        write!(out, "{} ", property.visibility.keyword())?;
        if property.is_static {
            write!(out, "static ")?;
        }
        if property.is_readonly {
            write!(out, "readonly ")?;
        }
        self.write_type(out, page, &property.ty)?;
        write!(out, " ${}", escape_html(&property.name))?;
        if let Some(value) = &property.default_value {
            write!(out, " = {}", escape_html(value))?;
        }
        writeln!(out, "</div>")?;
        if property.is_promoted {
            writeln!(out, "    <p class=\"origin\">Promoted constructor parameter</p>")?;
        }
        write_doc(out, &property.doc)?;
        writeln!(out, "  </div>")?;
        Ok(())
    }

    fn write_method(&self, out: &mut String, page: &str, method: &MethodInfo) -> RenderResult<()> {
        writeln!(out, "  <div class=\"item\" id=\"{}\">", method.id)?;
        writeln!(out, "    <h3><code>{}()</code></h3>", escape_html(&method.name))?;

        write!(out, "    <div class=\"signature\">")?;
        if method.is_final {
            write!(out, "final ")?;
        }
        if method.is_abstract {
            write!(out, "abstract ")?;
        }
        write!(out, "{} ", method.visibility.keyword())?;
        if method.is_static {
            write!(out, "static ")?;
        }
        write!(out, "function ")?;
        if method.returns_reference {
            write!(out, "&amp;")?;
        }
        write!(out, "{}", escape_html(&method.name))?;
        self.write_templates(out, page, &method.templates)?;
        write!(out, "(")?;
        for (i, parameter) in method.parameters.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            self.write_parameter(out, page, parameter)?;
        }
        write!(out, "): ")?;
        self.write_type(out, page, &method.return_doc_type)?;
        writeln!(out, "</div>")?;

        if let Some(origin) = &method.declaring_origin {
            write!(out, "    <p class=\"origin\">Declared in ")?;
            self.write_type(out, page, origin)?;
            writeln!(out, "</p>")?;
        }
        if !method.interface_origins.is_empty() {
            write!(out, "    <p class=\"origin\">Specified by ")?;
            self.write_list(out, page, &method.interface_origins)?;
            writeln!(out, "</p>")?;
        }

        write_doc(out, &method.doc)?;

        let described: Vec<&ParameterInfo> = method
            .parameters
            .iter()
            .filter(|p| !p.description.is_empty())
            .collect();
        if !described.is_empty() {
            writeln!(out, "    <div class=\"params\">")?;
            writeln!(out, "      <h4>Parameters</h4>")?;
            writeln!(out, "      <ul>")?;
            for parameter in described {
                write!(out, "        <li><code>${}</code> ", escape_html(&parameter.name))?;
                self.write_type(out, page, &parameter.doc_type)?;
                writeln!(out, " - {}</li>", markdown::to_inline_html(&parameter.description))?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </div>")?;
        }

        if let Some(returns) = &method.doc.returns {
            if !returns.description.is_empty() {
                writeln!(out, "    <div class=\"returns\">")?;
                writeln!(out, "      <h4>Returns</h4>")?;
                writeln!(out, "      {}", markdown::to_html(&returns.description).trim_end())?;
                writeln!(out, "    </div>")?;
            }
        }

        if !method.throws.is_empty() {
            writeln!(out, "    <div class=\"throws\">")?;
            writeln!(out, "      <h4>Throws</h4>")?;
            writeln!(out, "      <ul>")?;
            for (ty, tag) in method.throws.iter().zip(&method.doc.throws) {
                write!(out, "        <li>")?;
                self.write_type(out, page, ty)?;
                if !tag.description.is_empty() {
                    write!(out, " - {}", markdown::to_inline_html(&tag.description))?;
                }
                writeln!(out, "</li>")?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </div>")?;
        }

        writeln!(out, "  </div>")?;
        Ok(())
    }

    fn write_parameter(
        &self,
        out: &mut String,
        page: &str,
        parameter: &ParameterInfo,
    ) -> RenderResult<()> {
        self.write_type(out, page, &parameter.doc_type)?;
        write!(out, " ")?;
        if parameter.is_passed_by_reference {
            write!(out, "&amp;")?;
        }
        if parameter.is_variadic {
            write!(out, "...")?;
        }
        write!(out, "${}", escape_html(&parameter.name))?;
        if let Some(value) = &parameter.default_value {
            write!(out, " = {}", escape_html(value))?;
        }
        Ok(())
    }

    // ==================== Types ====================

    fn write_list(&self, out: &mut String, page: &str, types: &[VarType]) -> RenderResult<()> {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            self.write_type(out, page, ty)?;
        }
        Ok(())
    }

    fn write_type(&self, out: &mut String, page: &str, ty: &VarType) -> RenderResult<()> {
        match ty {
            VarType::Named { name, generics } => {
                write!(out, "{}", escape_html(name))?;
                self.write_generics(out, page, generics)?;
            }
            VarType::Structure { name, generics, .. } => {
                let basename = name.rsplit('\\').next().unwrap_or(name);
                match self.ctx.url_of(ty) {
                    Some(url) => write!(
                        out,
                        "<a href=\"{}\" title=\"{}\">{}</a>",
                        escape_html(&self.href(page, &url)),
                        escape_html(name),
                        escape_html(basename)
                    )?,
                    None => write!(
                        out,
                        "<abbr title=\"{}\">{}</abbr>",
                        escape_html(name),
                        escape_html(basename)
                    )?,
                }
                self.write_generics(out, page, generics)?;
            }
            VarType::Template(name) => {
                write!(out, "<span class=\"template\">{}</span>", escape_html(name))?;
            }
            VarType::Union(members) => self.write_members(out, page, members, "|")?,
            VarType::Intersection(members) => self.write_members(out, page, members, "&amp;")?,
            VarType::Callable {
                name,
                parameters,
                return_type,
            } => {
                self.write_type(out, page, name)?;
                write!(out, "(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    self.write_type(out, page, &parameter.ty)?;
                    if parameter.by_reference {
                        write!(out, " &amp;")?;
                    }
                    if parameter.is_variadic {
                        write!(out, "...")?;
                    }
                }
                write!(out, "): ")?;
                self.write_type(out, page, return_type)?;
            }
            VarType::Conditional {
                variable,
                match_type,
                true_type,
                false_type,
            } => {
                write!(out, "({} is ", escape_html(variable))?;
                self.write_type(out, page, match_type)?;
                write!(out, " ? ")?;
                self.write_type(out, page, true_type)?;
                write!(out, " : ")?;
                self.write_type(out, page, false_type)?;
                write!(out, ")")?;
            }
        }
        Ok(())
    }

    fn write_members(
        &self,
        out: &mut String,
        page: &str,
        members: &[VarType],
        separator: &str,
    ) -> RenderResult<()> {
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                write!(out, "{separator}")?;
            }
            let nested = matches!(
                member,
                VarType::Union(_) | VarType::Intersection(_) | VarType::Callable { .. }
            );
            if nested {
                write!(out, "(")?;
            }
            self.write_type(out, page, member)?;
            if nested {
                write!(out, ")")?;
            }
        }
        Ok(())
    }

    fn write_generics(&self, out: &mut String, page: &str, generics: &[VarType]) -> RenderResult<()> {
        if generics.is_empty() {
            return Ok(());
        }
        write!(out, "&lt;")?;
        self.write_list(out, page, generics)?;
        write!(out, "&gt;")?;
        Ok(())
    }

    /// Link from `page` to `url`; site-relative links get a relative path
    /// unless a base URL is configured
    fn href(&self, page: &str, url: &str) -> String {
        if !self.ctx.urls().base_url().is_empty() || url.contains("://") || url.starts_with('/') {
            return url.to_string();
        }
        format!("{}{url}", relative_root(page))
    }
}

fn structure_keywords(structure: &StructureInfo) -> String {
    let mut keywords = Vec::new();
    if structure.is_final() {
        keywords.push("final");
    }
    if structure.is_abstract() {
        keywords.push("abstract");
    }
    if structure.is_readonly() {
        keywords.push("readonly");
    }
    keywords.push(structure.kind().keyword());
    keywords.join(" ")
}

fn write_doc(out: &mut String, doc: &PhpDoc) -> RenderResult<()> {
    if let Some(deprecated) = &doc.deprecated {
        write!(out, "    <p class=\"deprecated\">Deprecated")?;
        if !deprecated.is_empty() {
            write!(out, ": {}", markdown::to_inline_html(deprecated))?;
        }
        writeln!(out, "</p>")?;
    }
    if !doc.texts.is_empty() {
        writeln!(out, "    <div class=\"description\">")?;
        write!(out, "{}", markdown::to_html(&doc.texts.join("\n\n")))?;
        writeln!(out, "    </div>")?;
    }
    let tags: Vec<(&str, &str)> = doc.generic_tags().collect();
    if !tags.is_empty() {
        writeln!(out, "    <dl class=\"tags\">")?;
        for (name, body) in tags {
            writeln!(
                out,
                "      <dt>@{}</dt><dd>{}</dd>",
                escape_html(name),
                escape_html(body)
            )?;
        }
        writeln!(out, "    </dl>")?;
    }
    Ok(())
}

fn write_foot(out: &mut String) -> RenderResult<()> {
    writeln!(out, "<footer>")?;
    writeln!(out, "  <p>Generated by apidoc {}</p>", crate::VERSION)?;
    writeln!(out, "</footer>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

const STYLES: &str = r"
:root {
  --bg-color: #fdfdfb;
  --text-color: #222;
  --accent-color: #4f5b93;
  --code-bg: #f2f2ee;
  --sidebar-bg: #eef0f6;
  --border-color: #d8d8d0;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background-color: var(--bg-color);
  color: var(--text-color);
  line-height: 1.6;
  display: flex;
}
.sidebar {
  width: 280px;
  background-color: var(--sidebar-bg);
  height: 100vh;
  position: fixed;
  overflow-y: auto;
  border-right: 1px solid var(--border-color);
  padding-bottom: 2rem;
}
.sidebar-header { padding: 1.25rem; border-bottom: 1px solid var(--border-color); }
.sidebar-header a { color: var(--accent-color); text-decoration: none; }
.sidebar ul { list-style: none; padding-left: 1rem; }
.sidebar li { font-size: 0.9rem; }
.sidebar li.namespace { color: #777; margin-top: 0.5rem; }
.sidebar li.current > a { font-weight: bold; }
.sidebar a { color: var(--text-color); text-decoration: none; }
.content { margin-left: 280px; padding: 2rem 3rem; max-width: 960px; }
header .namespace { color: #777; font-family: monospace; }
header h1 { font-size: 2rem; color: var(--accent-color); margin-bottom: 1rem; }
.kind { color: #777; font-weight: normal; font-size: 0.8em; }
.template { font-style: italic; }
.hierarchy dt { font-weight: bold; float: left; width: 7rem; }
.hierarchy dd { margin-left: 7rem; }
section { margin: 2rem 0; }
section h2 {
  font-size: 1.4rem;
  color: var(--accent-color);
  border-bottom: 2px solid var(--border-color);
  padding-bottom: 0.4rem;
  margin-bottom: 1rem;
}
.item { margin: 1.25rem 0; padding: 1rem; background: var(--code-bg); border-radius: 6px; }
.signature { font-family: 'Fira Code', Consolas, monospace; font-size: 0.9rem; overflow-x: auto; }
.origin { color: #777; font-size: 0.85rem; }
.deprecated { color: #a33; }
.description p { margin: 0.5rem 0; }
.params h4, .returns h4, .throws h4 { font-size: 0.9rem; color: #777; margin-top: 0.5rem; }
.params ul, .throws ul { list-style: none; padding-left: 1rem; }
.structures dd { color: #555; margin: 0 0 0.5rem 1rem; }
a { color: var(--accent-color); }
footer { position: fixed; bottom: 0; right: 0; padding: 0.5rem 1rem; font-size: 0.75rem; color: #888; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestProject;

    #[test]
    fn test_structure_page() {
        let ctx = TestProject::new()
            .file(
                "src/Box.php",
                r"<?php
                namespace App;

                /**
                 * Holds one value.
                 *
                 * @template T
                 * @implements \IteratorAggregate<int, T>
                 * @since 1.2
                 */
                final class Box implements \IteratorAggregate {
                    public const int LIMIT = 10;

                    /** @param T $value the `<boxed>` value */
                    public function __construct(private readonly mixed $value) {}

                    /** @return \Generator<int, T> */
                    public function getIterator(): \Generator {}
                }",
            )
            .context();
        let tree: StructureTree = ctx.documented().into_iter().collect();
        let renderer = HtmlRenderer::new(&ctx, &tree, "Acme");
        let structure = ctx.structure("App\\Box").expect("box");
        let html = renderer.render_structure(&structure).expect("renders");

        assert!(html.contains("<title>App\\Box - Acme</title>"));
        assert!(html.contains("<span class=\"kind\">final class</span> Box"));
        assert!(html.contains(
            "<a href=\"https://www.php.net/manual/en/class.iteratoraggregate.php\" \
             title=\"IteratorAggregate\">IteratorAggregate</a>&lt;int, <span class=\"template\">T</span>&gt;"
        ));
        assert!(html.contains("<p>Holds one value.</p>"));
        assert!(html.contains("<dt>@since</dt><dd>1.2</dd>"));
        assert!(html.contains("public const int LIMIT = 10"));
        assert!(html.contains("private readonly <span class=\"template\">T</span> $value"));
        assert!(html.contains("the <code>&lt;boxed&gt;</code> value"));
        assert!(html.contains("id=\"method-get-iterator\""));
        assert!(html.contains("<li class=\"current\"><a href=\"../../classes/app/box.html\">Box</a></li>"));
    }

    #[test]
    fn test_docblocks_render_as_markdown() {
        let ctx = TestProject::new()
            .file(
                "src/Cache.php",
                r"<?php
                namespace App;

                class Cache {
                    /**
                     * Stores a value. See [the guide](https://example.com/cache).
                     *
                     * - keys are **case sensitive**
                     * - values are <b>serialized</b>
                     *
                     * @param string $key cache `key`
                     * @return bool `true` when stored
                     * @throws \RuntimeException when the *store* is down
                     */
                    public function put(string $key): bool {}
                }",
            )
            .context();
        let tree: StructureTree = ctx.documented().into_iter().collect();
        let renderer = HtmlRenderer::new(&ctx, &tree, "Acme");
        let structure = ctx.structure("App\\Cache").expect("cache");
        let html = renderer.render_structure(&structure).expect("renders");

        assert!(html.contains("<a href=\"https://example.com/cache\">the guide</a>"));
        assert!(html.contains("<li>keys are <strong>case sensitive</strong></li>"));
        assert!(html.contains("<li>values are serialized</li>"));
        assert!(html.contains("cache <code>key</code></li>"));
        assert!(html.contains("<p><code>true</code> when stored</p>"));
        assert!(html.contains(" - when the <em>store</em> is down</li>"));
    }

    #[test]
    fn test_index_lists_namespaces() {
        let ctx = TestProject::new()
            .file("src/a.php", "<?php namespace App; /** First. */ class A {}")
            .file("src/b.php", "<?php /** Second. */ interface B {}")
            .context();
        let tree: StructureTree = ctx.documented().into_iter().collect();
        let html = HtmlRenderer::new(&ctx, &tree, "Acme")
            .render_index()
            .expect("renders");

        let app = html.find("<h2>App</h2>").expect("App section");
        let global = html.find("<h2>Global namespace</h2>").expect("global section");
        assert!(app < global);
        assert!(html.contains("<a href=\"classes/app/a.html\">A</a>"));
        assert!(html.contains("<dd>First.</dd>"));
        assert!(html.contains("<span class=\"kind\">interface</span>"));
    }
}
