use crate::key::KeyGen;
use crate::model::{Mark, Node};
use crate::portable::{
    AssetRef, Decorator, ImageBlock, ListKind, MarkDef, PortableBlock, Span, Style, TextBlock,
};
use tracing::{debug, trace};

pub(super) fn convert<K: KeyGen>(nodes: &[Node], keys: &mut K) -> Vec<PortableBlock> {
    let mut state = ToPortable {
        keys,
        out: Vec::with_capacity(nodes.len()),
    };
    for node in nodes {
        state.block(node);
    }
    state.out
}

struct ToPortable<'k, K> {
    keys: &'k mut K,
    out: Vec<PortableBlock>,
}

impl<K: KeyGen> ToPortable<'_, K> {
    fn block(&mut self, node: &Node) {
        match node {
            Node::Paragraph { content } => self.text_block(Style::Normal, content, None),
            Node::Heading { attrs, content } => {
                self.text_block(Style::heading(attrs.level), content, None)
            }
            Node::BulletList { content } => self.list(ListKind::Bullet, content, 1),
            Node::OrderedList { content, .. } => self.list(ListKind::Number, content, 1),
            Node::Blockquote { content } => {
                for child in content {
                    match child {
                        Node::Paragraph { content } => {
                            self.text_block(Style::Blockquote, content, None)
                        }
                        other => trace!("skipping {} in blockquote", other.type_name()),
                    }
                }
            }
            Node::CodeBlock { content, .. } => self.code_block(content),
            Node::Image { attrs } => match attrs.asset_ref.as_deref() {
                Some(id) if !id.is_empty() => {
                    let image = ImageBlock {
                        key: self.keys.next_key(),
                        asset: Some(AssetRef::new(id.to_owned())),
                        alt: attrs.alt.clone(),
                    };
                    self.out.push(PortableBlock::Image(image));
                }
                _ => debug!("dropping image without an asset reference"),
            },
            other => trace!("skipping {} at top level", other.type_name()),
        }
    }

    /// Emits one block per list item paragraph, depth first
    fn list(&mut self, kind: ListKind, items: &[Node], level: u32) {
        for item in items {
            let content = match item {
                Node::ListItem { content } => content,
                other => {
                    trace!("skipping {} in list", other.type_name());
                    continue;
                }
            };
            for child in content {
                match child {
                    Node::Paragraph { content } => {
                        self.text_block(Style::Normal, content, Some((kind.clone(), level)))
                    }
                    Node::BulletList { content } => self.list(ListKind::Bullet, content, level + 1),
                    Node::OrderedList { content, .. } => {
                        self.list(ListKind::Number, content, level + 1)
                    }
                    other => trace!("skipping {} in list item", other.type_name()),
                }
            }
        }
    }

    fn text_block(&mut self, style: Style, content: &[Node], list: Option<(ListKind, u32)>) {
        let mut block = TextBlock::new(self.keys.next_key(), style);
        for node in content {
            match node {
                Node::HardBreak => {
                    let span = Span::new(self.keys.next_key(), String::from("\n"), Vec::new());
                    block.children.push(span);
                }
                Node::Text { text, marks } => {
                    let key = self.keys.next_key();
                    let mut span_marks = Vec::with_capacity(marks.len());
                    for mark in marks {
                        if let Some(name) = span_mark(self.keys, mark, &mut block.mark_defs) {
                            span_marks.push(name);
                        }
                    }
                    block.children.push(Span::new(key, text.clone(), span_marks));
                }
                other => trace!("skipping inline {}", other.type_name()),
            }
        }
        if block.children.is_empty() {
            let span = Span::new(self.keys.next_key(), String::new(), Vec::new());
            block.children.push(span);
        }
        if let Some((kind, level)) = list {
            block.list_item = Some(kind);
            block.level = Some(level);
        }
        self.out.push(PortableBlock::Block(block));
    }

    fn code_block(&mut self, content: &[Node]) {
        let text: String = content
            .iter()
            .filter_map(|node| match node {
                Node::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let mut block = TextBlock::new(self.keys.next_key(), Style::Normal);
        let marks = vec![Decorator::Code.as_str().to_owned()];
        block.children.push(Span::new(self.keys.next_key(), text, marks));
        self.out.push(PortableBlock::Block(block));
    }
}

/// The name a span uses for `mark`, registering a mark definition if it needs one
fn span_mark<K: KeyGen>(keys: &mut K, mark: &Mark, mark_defs: &mut Vec<MarkDef>) -> Option<String> {
    let decorator = match mark {
        Mark::Bold => Decorator::Strong,
        Mark::Italic => Decorator::Em,
        Mark::Underline => Decorator::Underline,
        Mark::Code => Decorator::Code,
        Mark::Link { attrs } => {
            let key = keys.next_key();
            let name = key.to_string();
            mark_defs.push(MarkDef::Link {
                key,
                href: attrs.href.clone(),
            });
            return Some(name);
        }
        Mark::Unknown => {
            trace!("dropping unknown mark");
            return None;
        }
    };
    Some(decorator.as_str().to_owned())
}
