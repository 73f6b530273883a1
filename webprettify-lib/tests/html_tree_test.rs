use webprettify_lib::dom::dom_tree::{self, Handle, NodeData};
use webprettify_lib::parser::html::create_dom_tree;
use webprettify_lib::{prettify_html, prettify_html_bytes};

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub fn create_test_dom(html: &str) -> dom_tree::Document {
        create_dom_tree(html).expect("document should parse")
    }

    fn collect_structure(node: &Handle) -> String {
        let mut output = String::new();
        traverse_node(node, 0, &mut output);
        output
    }

    fn traverse_node(node: &Handle, depth: usize, output: &mut String) {
        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::DocumentRoot => {
                for child in &node_ref.children {
                    traverse_node(child, depth, output);
                }
            }
            NodeData::Element(elem_node) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), elem_node.tag);
                for child in &node_ref.children {
                    traverse_node(child, depth + 1, output);
                }
            }
            NodeData::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    *output += &format!("{}{}\n", "  ".repeat(depth), trimmed);
                }
            }
            NodeData::Comment(_) | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    #[test]
    fn test_basic_structure() {
        let html = r#"
            <!DOCTYPE html>
            <html>
                <head>
                    <title>Test</title>
                </head>
                <body>
                    <h1>Hello</h1>
                    <p>World</p>
                </body>
            </html>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
    <title>
      Test
  <body>
    <h1>
      Hello
    <p>
      World
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_void_elements() {
        let html = r#"
            <img src="test.jpg" alt="Test">
            <br>
            <input type="text">
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <img>
    <br>
    <input>
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_nested_elements() {
        let html = r#"
            <div class="container">
                <div class="row">
                    <div class="col">1</div>
                    <div class="col">2</div>
                </div>
            </div>
        "#;

        let document = create_test_dom(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
  <body>
    <div>
      <div>
        <div>
          1
        <div>
          2
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_attributes_are_kept_in_order() {
        let document = create_test_dom(r#"<a href="/x" class="link" data-id="7">x</a>"#);
        let root = document.root.borrow();
        let html = root.children[0].borrow();
        let body = html.children[1].borrow();
        let anchor = body.children[0].borrow();
        let elem = anchor.element().expect("anchor element");
        assert_eq!(elem.attribute("class"), Some("link"));
        let keys: Vec<&str> = elem.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["href", "class", "data-id"]);
    }

    #[test]
    fn test_prettified_document() {
        let html = "<!DOCTYPE html>\n<html>\n<head><title>Test</title></head>\n<body><h1>Hello</h1><p>World</p></body>\n</html>";
        let expected = "<!DOCTYPE html>\n<html>\n    <head>\n        <title>\n            Test\n        </title>\n    </head>\n    <body>\n        <h1>\n            Hello\n        </h1>\n        <p>\n            World\n        </p>\n    </body>\n</html>\n";

        let pretty = prettify_html(html, 4).unwrap();
        assert_eq!(pretty, expected);
        assert_eq!(prettify_html(&pretty, 4).unwrap(), pretty);
    }

    #[test]
    fn test_fragment_gets_full_document() {
        let pretty = prettify_html("<li>one<li>two", 2).unwrap();
        assert_eq!(
            pretty,
            "<html>\n  <head>\n  </head>\n  <body>\n    <li>\n      one\n    </li>\n    <li>\n      two\n    </li>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_malformed_markup_is_recovered() {
        let pretty = prettify_html("<div><span>open</div><p>after", 4).unwrap();
        assert!(pretty.contains("<span>\n                open\n            </span>"));
        assert!(pretty.contains("<p>\n            after\n        </p>"));
    }

    #[test]
    fn test_invalid_bytes_fail() {
        let err = prettify_html_bytes(&[b'<', b'p', b'>', 0xC3, 0x28], 4).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("HTML parse failure"));
    }
}
