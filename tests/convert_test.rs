// Import the library functions
use indoc::indoc;
use std::fs;
use std::path::PathBuf;
use xml_schema_gen::{
    convert, convert_file, convert_files, infer_schema, ConvertError, ConvertOptions, ListItem,
    OutputFormat, ParseError, Property,
};
use xml_schema_gen::parse_xml::MAX_DEPTH;

const FEED_XML: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <rss version="2.0">
      <channel>
        <title>News</title>
        <link>https://example.com</link>
        <item>
          <title>First</title>
          <pub_date>Mon, 01 Jan 2024</pub_date>
          <category>a</category>
          <category>b</category>
          <enclosure url="https://example.com/1.mp3" length="1" type="audio/mpeg"/>
        </item>
        <item>
          <title>Second</title>
          <pub_date>Tue, 02 Jan 2024</pub_date>
        </item>
      </channel>
    </rss>
"#};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_schema_shape() {
        let rss = infer_schema(FEED_XML).expect("Failed to infer schema");
        assert_eq!(rss.name, "rss");
        assert_eq!(rss.properties[0], Property::Attribute("version".into()));

        let channel = match &rss.properties[1] {
            Property::NestedChild(schema) => schema,
            other => panic!("expected nested channel, got {:?}", other),
        };
        assert_eq!(channel.properties[0], Property::LeafChild("title".into()));
        assert_eq!(channel.properties[1], Property::LeafChild("link".into()));

        // the first <item> wins the group
        let item = match &channel.properties[2] {
            Property::ListOf(ListItem::Nested(schema)) => schema,
            other => panic!("expected list of items, got {:?}", other),
        };
        assert_eq!(item.properties[0], Property::LeafChild("title".into()));
        assert_eq!(item.properties[1], Property::LeafChild("pub_date".into()));
        assert_eq!(item.properties[2], Property::ListOf(ListItem::Leaf("category".into())));
        assert!(matches!(item.properties[3], Property::NestedChild(ref s) if s.name == "enclosure"));
        assert_eq!(item.properties[4], Property::TextBody);
    }

    #[test]
    fn test_convert_file_writes_prefixed_output() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = dir.path().join("feed.xml");
        fs::write(&input, FEED_XML).unwrap();

        let output = convert_file(&input, &ConvertOptions::default()).expect("Failed to convert");
        assert_eq!(output, dir.path().join("generated_feed.xml"));

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("@Xml(name = \"rss\")\ndata class Rss(\n"));
        assert!(text.contains("    val itemList: List<Item>?,\n"));
        assert!(text.contains("    val pubDate: String?,\n"));
        assert!(text.contains("    val categoryList: List<String>?,\n"));
        assert!(text.contains("data class Enclosure(\n"));
    }

    #[test]
    fn test_convert_file_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feed.xml");
        fs::write(&input, FEED_XML).unwrap();

        let options = ConvertOptions {
            format: OutputFormat::Json,
            ..ConvertOptions::default()
        };
        let output = convert_file(&input, &options).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();

        assert_eq!(json["name"], "rss");
        assert_eq!(json["properties"][1]["kind"], "nested_child");
        assert_eq!(json["properties"][1]["value"]["name"], "channel");
    }

    #[test]
    fn test_malformed_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.xml");
        fs::write(&input, "<root><child></root>").unwrap();

        let err = convert_file(&input, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
        assert!(!dir.path().join("generated_broken.xml").exists());
    }

    #[test]
    fn test_batch_keeps_going_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.xml");
        let bad = dir.path().join("bad.xml");
        let missing = dir.path().join("missing.xml");
        fs::write(&good, "<a><b>1</b></a>").unwrap();
        fs::write(&bad, "<a>").unwrap();

        let out_dir = dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        let options = ConvertOptions {
            out_dir: Some(out_dir.clone()),
            ..ConvertOptions::default()
        };

        let inputs: Vec<PathBuf> = vec![good.clone(), bad.clone(), missing.clone()];
        let reports = convert_files(&inputs, &options);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].input, good);
        assert_eq!(reports[0].result.as_ref().unwrap(), &out_dir.join("generated_good.xml"));
        assert!(matches!(reports[1].result, Err(ConvertError::Parse { .. })));
        assert!(matches!(reports[2].result, Err(ConvertError::Read { .. })));
    }

    #[test]
    fn test_deep_documents_fail_cleanly() {
        let depth = MAX_DEPTH * 8;
        let xml = format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(convert(&xml).starts_with("Parsing error!\n"));

        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("deep.xml");
        let at_limit = dir.path().join("at_limit.xml");
        fs::write(&deep, &xml).unwrap();
        fs::write(
            &at_limit,
            format!("{}x{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH)),
        )
        .unwrap();

        // batch work runs on pool threads with smaller stacks
        let reports = convert_files(&[deep.clone(), at_limit], &ConvertOptions::default());
        assert!(matches!(
            reports[0].result,
            Err(ConvertError::Parse { source: ParseError::TooDeep { .. }, .. })
        ));
        let output = reports[1].result.as_ref().expect("nesting at the limit should convert");
        assert_eq!(
            fs::read_to_string(output).unwrap().matches("data class A(").count(),
            MAX_DEPTH - 1
        );
        assert!(!dir.path().join("generated_deep.xml").exists());
    }
}
