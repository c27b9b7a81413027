//! Tree markup serializer.
//!
//! Every node becomes an `entry` element carrying its id and a name
//! attribute named after its type (`package`, `file`, `item`):
//!
//! ```text
//! <root>
//!   <entry id="3" package="pkg">
//!     <params><elem id="1" params="(7, 3, 10, 20)"/></params>
//!     <entry id="2" file="file.cpp">
//!       <params><elem id="1" params="(7, 3, 10, 20)"/></params>
//!       <path>pkg/file.cpp</path>
//!       <entry id="1" item="foo">
//!         <mmcc>7</mmcc><tmcc>3</tmcc><sif>10</sif><flf>42</flf><lif>20</lif>
//!         <path>pkg/file.cpp(42):</path>
//!       </entry>
//!     </entry>
//!   </entry>
//! </root>
//! ```
//!
//! Containers that went through the statistics pass also carry a
//! `statistics` element with `mean`, `median` and `deviation` tuples.

use crate::tree::{Container, Node, NodeKind, Tree};

/// Markup layout options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkupConfig {
    /// Indent nested elements by two spaces, one element per line
    pub pretty: bool,
}

impl MarkupConfig {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Serialize the tree
///
/// **Public** - main entry point for markup output
///
/// Pure function of the tree: the same tree always renders byte-identically.
/// A tree without nodes renders as an empty string.
pub fn tree_to_markup(tree: &Tree, config: MarkupConfig) -> String {
    if tree.is_empty() {
        return String::new();
    }

    let mut writer = MarkupWriter::new(config);
    writer.open("root", &[]);
    for node in tree.roots().values() {
        write_node(&mut writer, node);
    }
    writer.close("root");
    writer.finish()
}

fn write_node(writer: &mut MarkupWriter, node: &Node) {
    let id = node.id.to_string();
    writer.open(
        "entry",
        &[("id", id.as_str()), (node.node_type().name(), node.name.as_str())],
    );

    match &node.kind {
        NodeKind::Package(container) => {
            write_container(writer, container);
        }
        NodeKind::File(file) => {
            write_container_stats(writer, &file.container);
            writer.text_element("path", &file.source_path);
            for child in file.container.children.values() {
                write_node(writer, child);
            }
        }
        NodeKind::Item(item) => {
            writer.text_element("mmcc", &item.mmcc.to_string());
            writer.text_element("tmcc", &item.tmcc.to_string());
            writer.text_element("sif", &item.sif.to_string());
            writer.text_element("flf", &item.flf.to_string());
            writer.text_element("lif", &item.lif.to_string());
            writer.text_element("path", &item.full_path);
        }
    }

    writer.close("entry");
}

fn write_container(writer: &mut MarkupWriter, container: &Container) {
    write_container_stats(writer, container);
    for child in container.children.values() {
        write_node(writer, child);
    }
}

fn write_container_stats(writer: &mut MarkupWriter, container: &Container) {
    if container.child_stats.is_empty() {
        writer.empty("params", &[]);
    } else {
        writer.open("params", &[]);
        for (child_id, stats) in &container.child_stats {
            let id = child_id.to_string();
            let params = stats.to_string();
            writer.empty("elem", &[("id", id.as_str()), ("params", params.as_str())]);
        }
        writer.close("params");
    }

    if let Some(aggregate) = &container.aggregate {
        writer.open("statistics", &[]);
        writer.text_element("mean", &aggregate.mean.to_string());
        writer.text_element("median", &aggregate.median.to_string());
        writer.text_element("deviation", &aggregate.deviation.to_string());
        writer.close("statistics");
    }
}

/// Minimal element writer with optional indentation
struct MarkupWriter {
    out: String,
    depth: usize,
    pretty: bool,
}

impl MarkupWriter {
    fn new(config: MarkupConfig) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            pretty: config.pretty,
        }
    }

    fn open(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.start_line();
        self.push_tag(tag, attributes);
        self.out.push('>');
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.start_line();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn empty(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.start_line();
        self.push_tag(tag, attributes);
        self.out.push_str("/>");
    }

    fn text_element(&mut self, tag: &str, text: &str) {
        self.start_line();
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.out.push_str(&escape(text));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn push_tag(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
    }

    fn start_line(&mut self) {
        if self.pretty {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    fn finish(mut self) -> String {
        self.out.push('\n');
        self.out
    }
}

/// Escape the five XML special characters
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
