use super::Options;
use crate::model::{Fragment, HeadingAttrs, ImageAttrs, Mark, Node, OrderedListAttrs};
use crate::portable::{Decorator, ImageBlock, ListKind, MarkDef, PortableBlock, Style, TextBlock};
use tracing::trace;

/// The deepest list nesting rebuilt from stored levels
pub const MAX_LIST_DEPTH: u32 = 16;

pub(super) fn convert(blocks: &[PortableBlock], options: &Options) -> Node {
    let mut content = Vec::with_capacity(blocks.len());
    let mut pos = 0;
    while pos < blocks.len() {
        let block = match &blocks[pos] {
            PortableBlock::Block(block) => block,
            PortableBlock::Image(image) => {
                content.push(image_node(image));
                pos += 1;
                continue;
            }
            PortableBlock::Unknown => {
                trace!("skipping unknown block at {}", pos);
                pos += 1;
                continue;
            }
        };

        if let Some(kind) = &block.list_item {
            let list = if options.nest_lists {
                nested_list(blocks, &mut pos, kind, list_level(block))
            } else {
                flat_list(blocks, &mut pos, kind)
            };
            content.push(list);
            continue;
        }

        if let Some(level) = block.style.heading_level() {
            content.push(Node::Heading {
                attrs: HeadingAttrs { level },
                content: inline_content(block),
            });
        } else if block.style == Style::Blockquote {
            let paragraph = Node::paragraph(inline_content(block));
            let continues = options.merge_blockquotes && pos > 0 && is_quote(&blocks[pos - 1]);
            match content.last_mut() {
                Some(Node::Blockquote { content: quote }) if continues => quote.push(paragraph),
                _ => content.push(Node::Blockquote {
                    content: vec![paragraph],
                }),
            }
        } else if block.is_code_block() {
            let text = block.children[0].text.clone();
            content.push(Node::CodeBlock {
                attrs: Default::default(),
                content: vec![Node::text(text)],
            });
        } else {
            content.push(Node::paragraph(inline_content(block)));
        }
        pos += 1;
    }

    if content.is_empty() {
        content.push(Node::paragraph(Vec::new()));
    }
    Node::Doc { content }
}

fn is_quote(block: &PortableBlock) -> bool {
    match block {
        PortableBlock::Block(block) => block.list_item.is_none() && block.style == Style::Blockquote,
        _ => false,
    }
}

fn image_node(image: &ImageBlock) -> Node {
    Node::Image {
        attrs: ImageAttrs {
            asset_ref: image.asset_ref().map(str::to_owned),
            alt: image.alt.clone(),
            url: None,
        },
    }
}

/// The block at `pos`, if it is a list item
fn list_block(blocks: &[PortableBlock], pos: usize) -> Option<&TextBlock> {
    match blocks.get(pos) {
        Some(PortableBlock::Block(block)) if block.list_item.is_some() => Some(block),
        _ => None,
    }
}

fn list_level(block: &TextBlock) -> u32 {
    block.level.unwrap_or(1).max(1)
}

fn list_node(kind: &ListKind, items: Fragment) -> Node {
    match kind {
        ListKind::Bullet => Node::BulletList { content: items },
        ListKind::Number | ListKind::Other(_) => Node::OrderedList {
            attrs: OrderedListAttrs::default(),
            content: items,
        },
    }
}

fn list_item(block: &TextBlock) -> Node {
    Node::ListItem {
        content: vec![Node::paragraph(inline_content(block))],
    }
}

/// Collects all following blocks of the same list kind into one list,
/// ignoring their level.
fn flat_list(blocks: &[PortableBlock], pos: &mut usize, kind: &ListKind) -> Node {
    let mut items = Vec::new();
    while let Some(block) = list_block(blocks, *pos) {
        if block.list_item.as_ref() != Some(kind) {
            break;
        }
        items.push(list_item(block));
        *pos += 1;
    }
    list_node(kind, items)
}

/// An open list while rebuilding nested lists
struct Frame<'a> {
    kind: &'a ListKind,
    level: u32,
    items: Fragment,
}

impl Frame<'_> {
    /// Closes `nested` into the last item of this list
    fn attach(&mut self, nested: Node) {
        match self.items.last_mut() {
            Some(Node::ListItem { content }) => content.push(nested),
            _ => self.items.push(Node::ListItem {
                content: vec![Node::paragraph(Vec::new()), nested],
            }),
        }
    }
}

/// Builds a list at `level`, nesting deeper blocks into the preceding item.
///
/// Stops at the first block that is not a list item, is less deep, or is at
/// the same depth but of a different kind. Levels beyond [`MAX_LIST_DEPTH`]
/// are treated as that depth.
fn nested_list<'a>(
    blocks: &'a [PortableBlock],
    pos: &mut usize,
    kind: &'a ListKind,
    level: u32,
) -> Node {
    let mut base = Frame {
        kind,
        level: level.min(MAX_LIST_DEPTH),
        items: Vec::new(),
    };
    let mut open: Vec<Frame<'a>> = Vec::new();

    while let Some(block) = list_block(blocks, *pos) {
        let block_level = list_level(block).min(MAX_LIST_DEPTH);
        let block_kind = block.list_item.as_ref().unwrap_or(kind);

        // close the lists this block can't continue
        while let Some(top) = open.last() {
            if top.level < block_level || (top.level == block_level && top.kind == block_kind) {
                break;
            }
            if let Some(frame) = open.pop() {
                let nested = list_node(frame.kind, frame.items);
                open.last_mut().unwrap_or(&mut base).attach(nested);
            }
        }

        let top = open.last_mut().unwrap_or(&mut base);
        if block_level == top.level {
            if block_kind != top.kind {
                break;
            }
            top.items.push(list_item(block));
        } else if block_level > top.level {
            open.push(Frame {
                kind: block_kind,
                level: block_level,
                items: vec![list_item(block)],
            });
        } else {
            break;
        }
        *pos += 1;
    }

    while let Some(frame) = open.pop() {
        let nested = list_node(frame.kind, frame.items);
        open.last_mut().unwrap_or(&mut base).attach(nested);
    }
    list_node(base.kind, base.items)
}

/// One text node per span
fn inline_content(block: &TextBlock) -> Fragment {
    block
        .children
        .iter()
        .map(|span| Node::Text {
            text: span.text.clone(),
            marks: span
                .marks
                .iter()
                .filter_map(|token| editor_mark(block, token))
                .collect(),
        })
        .collect()
}

fn editor_mark(block: &TextBlock, token: &str) -> Option<Mark> {
    if let Ok(decorator) = token.parse::<Decorator>() {
        return Some(match decorator {
            Decorator::Strong => Mark::Bold,
            Decorator::Em => Mark::Italic,
            Decorator::Underline => Mark::Underline,
            Decorator::Code => Mark::Code,
        });
    }
    match block.mark_def(token) {
        Some(MarkDef::Link { href, .. }) => Some(Mark::link(href.as_str())),
        _ => {
            trace!("dropping unresolved mark {:?}", token);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MAX_LIST_DEPTH;
    use crate::convert::{from_portable, from_portable_with, Options};
    use crate::model::Node;
    use crate::portable::PortableBlock;
    use serde_json::{json, Value};

    fn blocks(value: Value) -> Vec<PortableBlock> {
        serde_json::from_value(value).unwrap()
    }

    fn item(kind: &str, level: u32, text: &str) -> Value {
        json!({
            "_type": "block",
            "style": "normal",
            "listItem": kind,
            "level": level,
            "children": [{ "_type": "span", "text": text, "marks": [] }],
            "markDefs": []
        })
    }

    fn text_block(style: &str, text: &str) -> Value {
        json!({
            "_type": "block",
            "style": style,
            "children": [{ "_type": "span", "text": text, "marks": [] }],
            "markDefs": []
        })
    }

    fn list(kind: &str, items: Vec<Value>) -> Value {
        json!({ "type": kind, "content": items })
    }

    fn list_item(text: &str, nested: Option<Value>) -> Value {
        let mut content = vec![json!({ "type": "paragraph", "content": [{ "type": "text", "text": text }] })];
        content.extend(nested);
        json!({ "type": "listItem", "content": content })
    }

    fn to_value(doc: Node) -> Value {
        serde_json::to_value(doc).unwrap()
    }

    #[test]
    fn test_marks() {
        let doc = from_portable(&blocks(json!([{
            "_type": "block",
            "_key": "b",
            "style": "normal",
            "children": [
                { "_type": "span", "text": "bold", "marks": ["strong", "em"] },
                { "_type": "span", "text": "link", "marks": ["l1", "underline", "missing"] }
            ],
            "markDefs": [{ "_type": "link", "_key": "l1", "href": "https://example.com" }]
        }])));
        assert_eq!(
            to_value(doc),
            json!({ "type": "doc", "content": [{ "type": "paragraph", "content": [
                { "type": "text", "text": "bold", "marks": [{ "type": "bold" }, { "type": "italic" }] },
                { "type": "text", "text": "link", "marks": [
                    { "type": "link", "attrs": { "href": "https://example.com" } },
                    { "type": "underline" }
                ]}
            ]}]})
        );
    }

    #[test]
    fn test_link_without_href() {
        let doc = from_portable(&blocks(json!([{
            "_type": "block",
            "children": [{ "_type": "span", "text": "x", "marks": ["a"] }],
            "markDefs": [{ "_type": "link", "_key": "a" }]
        }])));
        assert_eq!(
            to_value(doc)["content"][0]["content"][0]["marks"],
            json!([{ "type": "link", "attrs": { "href": "" } }])
        );
    }

    #[test]
    fn test_block_styles() {
        let doc = from_portable(&blocks(json!([
            text_block("h3", "Title"),
            text_block("blockquote", "Quote"),
            {
                "_type": "block",
                "style": "normal",
                "children": [{ "_type": "span", "text": "const x = 1;", "marks": ["code"] }],
                "markDefs": []
            },
            text_block("lead", "Other"),
            { "_type": "image", "asset": { "_type": "reference", "_ref": "image-1" }, "alt": "A" },
            { "_type": "table", "rows": [] }
        ])));
        assert_eq!(
            to_value(doc),
            json!({ "type": "doc", "content": [
                { "type": "heading", "attrs": { "level": 3 }, "content": [{ "type": "text", "text": "Title" }] },
                { "type": "blockquote", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "Quote" }] }
                ]},
                { "type": "codeBlock", "attrs": { "language": null }, "content": [{ "type": "text", "text": "const x = 1;" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "Other" }] },
                { "type": "image", "attrs": { "assetRef": "image-1", "alt": "A", "url": null } }
            ]})
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            from_portable(&[]),
            Node::Doc {
                content: vec![Node::paragraph(Vec::new())]
            }
        );
        assert_eq!(
            from_portable(&[PortableBlock::Unknown]),
            Node::Doc {
                content: vec![Node::paragraph(Vec::new())]
            }
        );
    }

    #[test]
    fn test_nested_lists() {
        let doc = from_portable(&blocks(json!([
            item("bullet", 1, "a"),
            item("number", 2, "a.1"),
            item("number", 2, "a.2"),
            item("bullet", 1, "b"),
            item("number", 1, "c"),
            text_block("normal", "after")
        ])));
        assert_eq!(
            to_value(doc)["content"],
            json!([
                list("bulletList", vec![
                    list_item("a", Some(json!({
                        "type": "orderedList",
                        "attrs": { "start": 1 },
                        "content": [list_item("a.1", None), list_item("a.2", None)]
                    }))),
                    list_item("b", None),
                ]),
                {
                    "type": "orderedList",
                    "attrs": { "start": 1 },
                    "content": [list_item("c", None)]
                },
                { "type": "paragraph", "content": [{ "type": "text", "text": "after" }] }
            ])
        );
    }

    fn list_depth(node: &Node) -> u32 {
        let own = match node {
            Node::BulletList { .. } | Node::OrderedList { .. } => 1,
            _ => 0,
        };
        own + node.content().iter().map(list_depth).max().unwrap_or(0)
    }

    #[test]
    fn test_sibling_sublists() {
        let doc = from_portable(&blocks(json!([
            item("bullet", 1, "a"),
            item("bullet", 2, "a.1"),
            item("number", 2, "a.2"),
            item("bullet", 1, "b")
        ])));
        assert_eq!(
            to_value(doc)["content"],
            json!([list("bulletList", vec![
                json!({
                    "type": "listItem",
                    "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "a" }] },
                        list("bulletList", vec![list_item("a.1", None)]),
                        {
                            "type": "orderedList",
                            "attrs": { "start": 1 },
                            "content": [list_item("a.2", None)]
                        }
                    ]
                }),
                list_item("b", None)
            ])])
        );
    }

    #[test]
    fn test_deep_levels() {
        let input: Vec<Value> = (1..=5000u32)
            .map(|level| item("bullet", level, "x"))
            .collect();
        let doc = from_portable(&blocks(Value::Array(input)));
        assert_eq!(doc.content().len(), 1);
        assert_eq!(list_depth(&doc), MAX_LIST_DEPTH);
        assert_eq!(doc.text_content().len(), 5000);

        let input: Vec<Value> = (0..5000u32)
            .map(|i| item("number", 1 + i % 40, "y"))
            .collect();
        let doc = from_portable(&blocks(Value::Array(input)));
        assert_eq!(doc.content().len(), 1);
        assert_eq!(list_depth(&doc), MAX_LIST_DEPTH);
        assert_eq!(doc.text_content().len(), 5000);
    }

    #[test]
    fn test_invalid_levels() {
        let doc = from_portable(&blocks(json!([
            {
                "_type": "block",
                "listItem": "bullet",
                "level": -3,
                "children": [{ "_type": "span", "text": "a" }]
            },
            item("bullet", 1, "b")
        ])));
        assert_eq!(
            to_value(doc)["content"],
            json!([list("bulletList", vec![list_item("a", None), list_item("b", None)])])
        );
    }

    #[test]
    fn test_flat_lists() {
        let options = Options {
            nest_lists: false,
            ..Options::default()
        };
        let doc = from_portable_with(
            &blocks(json!([
                item("bullet", 1, "a"),
                item("bullet", 2, "a.1"),
                item("bullet", 1, "b"),
                item("number", 1, "c")
            ])),
            &options,
        );
        let content = to_value(doc)["content"].clone();
        assert_eq!(content.as_array().unwrap().len(), 2);
        assert_eq!(
            content[0],
            list("bulletList", vec![
                list_item("a", None),
                list_item("a.1", None),
                list_item("b", None)
            ])
        );
        assert_eq!(content[1]["type"], "orderedList");
    }

    #[test]
    fn test_list_starting_deep() {
        let doc = from_portable(&blocks(json!([
            item("bullet", 3, "deep"),
            item("bullet", 1, "top")
        ])));
        let content = to_value(doc)["content"].clone();
        assert_eq!(
            content,
            json!([
                list("bulletList", vec![list_item("deep", None)]),
                list("bulletList", vec![list_item("top", None)])
            ])
        );
    }

    #[test]
    fn test_blockquotes() {
        let input = blocks(json!([
            text_block("blockquote", "one"),
            text_block("blockquote", "two"),
            text_block("normal", "between"),
            text_block("blockquote", "three")
        ]));

        let split = to_value(from_portable(&input));
        assert_eq!(split["content"].as_array().unwrap().len(), 4);
        assert_eq!(split["content"][1]["type"], "blockquote");

        let options = Options {
            merge_blockquotes: true,
            ..Options::default()
        };
        let merged = to_value(from_portable_with(&input, &options));
        assert_eq!(merged["content"].as_array().unwrap().len(), 3);
        assert_eq!(
            merged["content"][0],
            json!({ "type": "blockquote", "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] }
            ]})
        );
        assert_eq!(merged["content"][2]["content"][0]["content"][0]["text"], "three");
    }
}
