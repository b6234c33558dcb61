//! Cây phần tử cho shadow root của card và bộ chuyển sang HTML.

use std::fmt;

use crate::view::{CardView, TimelineItem, EMPTY_MESSAGE, ERROR_HEADER, PHOTO_ALT};

/// CSS của card, khớp với cấu trúc do [`card_tree`] sinh ra.
pub const CARD_STYLES: &str = r#"
ha-card { padding: 16px; }
.timeline { position: relative; padding-left: 50px; }
.timeline::before {
  content: ''; position: absolute; left: 18px; top: 10px; bottom: 10px; width: 2px; background: var(--primary-color);
}
.timeline-item { position: relative; margin-bottom: 24px; }
.timeline-icon {
  position: absolute; left: -33px; top: 0;
  color: var(--primary-color);
  background-color: var(--card-background-color);
  border-radius: 50%; display: flex;
  align-items: center; justify-content: center;
  z-index: 1; width: 40px; height: 40px;
}
.timeline-content .title { font-weight: bold; font-size: 1.1em; margin-bottom: 4px; }
.timeline-content .time { color: var(--secondary-text-color); font-size: 0.9em; margin-bottom: 8px; }
.timeline-content .description { color: var(--primary-text-color); }
.timeline-content .staff { font-style: italic; color: var(--secondary-text-color); margin-top: 4px; }
.timeline-content img { max-width: 100%; border-radius: 8px; margin-top: 8px; }
.no-activities { padding: 16px; }
"#;

pub const ERROR_STYLES: &str = ".error { color: var(--error-color); padding: 16px; }";

const VOID_ELEMENTS: [&str; 3] = ["img", "br", "input"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Nội dung tĩnh tin cậy (CSS), không escape.
    Raw(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => escape_into(text, false, out),
            Node::Raw(raw) => out.push_str(raw),
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&element.tag) {
                    return;
                }

                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(element.tag);
                out.push('>');
            }
        }
    }

    /// Duyệt sâu và gom mọi phần tử có class đúng bằng `class`.
    pub fn find_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let Node::Element(element) = self {
            if element.get_attr("class") == Some(class) {
                found.push(element);
            }
            for child in &element.children {
                child.find_by_class(class, found);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

/// Toàn bộ nội dung shadow root: thẻ `<style>` và `ha-card`.
pub fn card_tree(view: &CardView) -> Vec<Node> {
    match view {
        CardView::Error { message } => vec![
            Element::new("style").child(Node::Raw(ERROR_STYLES)).into(),
            Element::new("ha-card")
                .attr("header", ERROR_HEADER)
                .child(Element::new("div").class("error").text(message.clone()))
                .into(),
        ],
        CardView::Empty { header } => vec![
            Element::new("style").child(Node::Raw(CARD_STYLES)).into(),
            container(
                header,
                Element::new("div").class("no-activities").text(EMPTY_MESSAGE),
            ),
        ],
        CardView::Timeline { header, items } => vec![
            Element::new("style").child(Node::Raw(CARD_STYLES)).into(),
            container(
                header,
                Element::new("div")
                    .class("timeline")
                    .children(items.iter().map(timeline_item)),
            ),
        ],
    }
}

fn container(header: &str, body: Element) -> Node {
    Element::new("ha-card")
        .attr("header", header)
        .child(
            Element::new("div")
                .attr("id", "timeline-container")
                .child(body),
        )
        .into()
}

fn timeline_item(item: &TimelineItem) -> Element {
    let mut content = Element::new("div")
        .class("timeline-content")
        .child(Element::new("div").class("title").text(item.title.clone()))
        .child(Element::new("div").class("time").text(item.time.clone()))
        .child(
            Element::new("div")
                .class("description")
                .text(item.description.clone()),
        );

    if let Some(staff) = item.staff_line() {
        content = content.child(Element::new("div").class("staff").text(staff));
    }
    if let Some(url) = &item.photo_url {
        content = content.child(
            Element::new("img")
                .attr("src", url.clone())
                .attr("alt", PHOTO_ALT),
        );
    }

    Element::new("div")
        .class("timeline-item")
        .child(
            Element::new("div")
                .class("timeline-icon")
                .child(Element::new("ha-icon").attr("icon", item.icon.clone())),
        )
        .child(content)
}

/// HTML hoàn chỉnh để gán vào shadow root.
pub fn render_html(view: &CardView) -> String {
    card_tree(view).iter().map(Node::to_html).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("div")
            .attr("title", "a \"quoted\" <value>")
            .text("Tom & <Jerry>")
            .into();
        assert_eq!(
            node.to_html(),
            "<div title=\"a &quot;quoted&quot; &lt;value&gt;\">Tom &amp; &lt;Jerry&gt;</div>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = Element::new("img").attr("src", "x.png").into();
        assert_eq!(node.to_html(), "<img src=\"x.png\">");
    }

    #[test]
    fn error_card_markup() {
        let html = render_html(&CardView::entity_not_found("sensor.kid"));
        assert!(html.ends_with(
            "<ha-card header=\"Timeline Card Error\"><div class=\"error\">Entity not found: sensor.kid</div></ha-card>"
        ));
        assert!(!html.contains("timeline-container"));
    }

    #[test]
    fn empty_card_markup() {
        let html = render_html(&CardView::Empty {
            header: "Kid".to_string(),
        });
        assert!(html.contains(
            "<ha-card header=\"Kid\"><div id=\"timeline-container\"><div class=\"no-activities\">No activities to display.</div></div></ha-card>"
        ));
        assert!(!html.contains("timeline-item\""));
    }
}
