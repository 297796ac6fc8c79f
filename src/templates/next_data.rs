//! Recovers template data from the page state a detail page embeds in a
//! `<script id="__NEXT_DATA__">` element.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::TemplateDetail;
use crate::constants::NEXT_DATA_ELEMENT_ID;
use crate::error::MemeError;

#[allow(clippy::expect_used)] // constant pattern, exercised by the tests below
static NEXT_DATA_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)<script\b[^>]*?\sid\s*=\s*["']?{}["']?(?:\s[^>]*)?>(.*?)</script\s*>"#,
        regex::escape(NEXT_DATA_ELEMENT_ID)
    ))
    .expect("valid page state pattern")
});

#[derive(Debug, Deserialize)]
struct NextData {
    props: NextProps,
}

#[derive(Debug, Deserialize)]
struct NextProps {
    #[serde(rename = "pageProps")]
    page_props: TemplateDetail,
}

/// Text content of the page state element, if the page has one.
pub fn embedded_json(html: &str) -> Option<&str> {
    NEXT_DATA_SCRIPT
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|content| content.as_str().trim())
}

/// Parses the page state JSON into a validated [`TemplateDetail`].
pub fn parse_page_state(json: &str) -> Result<TemplateDetail, MemeError> {
    let next_data: NextData = serde_json::from_str(json)
        .map_err(|err| MemeError::InvalidTemplateSchema(err.to_string()))?;
    let detail = next_data.props.page_props;

    if detail.image_url.trim().is_empty() {
        return Err(MemeError::InvalidTemplateSchema(
            "empty image URL".to_string(),
        ));
    }
    if detail.image_width == 0 || detail.image_height == 0 {
        return Err(MemeError::InvalidTemplateSchema(format!(
            "image dimensions {}x{}",
            detail.image_width, detail.image_height
        )));
    }
    if detail.caption_boxes.is_empty() {
        return Err(MemeError::InvalidTemplateSchema(
            "template has no caption boxes".to_string(),
        ));
    }
    Ok(detail)
}

/// Extracts the template description from a detail page.
pub fn parse_template_page(html: &str, name: &str) -> Result<TemplateDetail, MemeError> {
    let json =
        embedded_json(html).ok_or_else(|| MemeError::MissingEmbeddedData(name.to_string()))?;
    debug!("Found {} bytes of page state for {name:?}", json.len());
    parse_page_state(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{next_data_page, sample_page_props};
    use serde_json::json;

    #[test]
    fn parses_embedded_template() {
        let html = next_data_page(&sample_page_props("https://example.com/meme.jpg"));
        let detail = parse_template_page(&html, "test_meme").expect("parse page");

        assert_eq!(detail.image_url, "https://example.com/meme.jpg");
        assert_eq!(detail.image_width, 300);
        assert_eq!(detail.image_height, 200);
        assert_eq!(detail.page_title.as_deref(), Some("Test Meme"));
        assert_eq!(detail.image_name.as_deref(), Some("test_meme"));
        assert_eq!(
            detail.image_description.as_deref(),
            Some("Test meme description")
        );
        assert_eq!(detail.caption_boxes.len(), 1);

        let caption = &detail.caption_boxes[0];
        assert_eq!((caption.x, caption.y), (10, 10));
        assert_eq!((caption.width, caption.height), (280, 180));
        assert_eq!(caption.font_size, 20.0);
        assert_eq!(caption.font_family.as_deref(), Some("Impact"));
        assert_eq!(caption.language.as_deref(), Some("en"));
        assert_eq!(caption.rotate_angle, 0.0);
    }

    #[test]
    fn finds_single_quoted_marker() {
        let html = r#"<html><body><script id='__NEXT_DATA__'>{"props":{}}</script></body></html>"#;
        assert_eq!(embedded_json(html), Some(r#"{"props":{}}"#));
    }

    #[test]
    fn ignores_lookalike_elements() {
        let html = r#"<script data-id="__NEXT_DATA__">{}</script><script id="__NEXT_DATA__X">{}</script><div id="__NEXT_DATA__">{}</div>"#;
        assert_eq!(embedded_json(html), None);
    }

    #[test]
    fn missing_marker_is_missing_embedded_data() {
        let result = parse_template_page("<html><body></body></html>", "t1");
        assert!(matches!(result, Err(MemeError::MissingEmbeddedData(name)) if name == "t1"));
    }

    #[test]
    fn accepts_alternate_field_names() {
        let props = json!({
            "imageUrl": "/a.png",
            "imageWidth": 300,
            "imageHeight": 200,
            "captionBoxes": [{"x": 10, "y": 10, "width": 280, "height": 180, "fontSize": 20}],
        });
        let detail = parse_template_page(&next_data_page(&props), "t1").expect("parse page");
        assert_eq!(detail.image_url, "/a.png");
        assert_eq!(detail.caption_boxes[0].font_family, None);
        assert_eq!(detail.caption_boxes[0].rotate_angle, 0.0);
    }

    #[test]
    fn primary_field_names_win_over_alternates() {
        let mut props = sample_page_props("/primary.png");
        props["imageUrl"] = json!("/alternate.png");
        props["captionBoxes"] = json!([]);

        let detail = parse_template_page(&next_data_page(&props), "t1").expect("parse page");
        assert_eq!(detail.image_url, "/primary.png");
        assert_eq!(detail.caption_boxes.len(), 1);
    }

    #[test]
    fn whole_floats_are_accepted_as_pixels() {
        let mut props = sample_page_props("/a.png");
        props["imageWidth"] = json!(300.0);
        props["initialCaptions"][0]["x"] = json!(10.0);
        props["initialCaptions"][0]["height"] = json!(180.0);

        let detail = parse_template_page(&next_data_page(&props), "t1").expect("parse page");
        assert_eq!(detail.image_width, 300);
        assert_eq!(detail.caption_boxes[0].x, 10);
        assert_eq!(detail.caption_boxes[0].height, 180);
    }

    #[test]
    fn fractional_or_negative_sizes_are_invalid_schema() {
        let mut fractional = sample_page_props("/a.png");
        fractional["initialCaptions"][0]["x"] = json!(10.5);
        let mut negative = sample_page_props("/a.png");
        negative["initialCaptions"][0]["width"] = json!(-280);

        for props in [fractional, negative] {
            let result = parse_template_page(&next_data_page(&props), "t1");
            assert!(
                matches!(result, Err(MemeError::InvalidTemplateSchema(_))),
                "{props} gave {result:?}"
            );
        }
    }

    #[test]
    fn bad_page_state_is_invalid_schema() {
        let mut no_captions = sample_page_props("/a.png");
        no_captions["initialCaptions"] = json!([]);
        let mut zero_width = sample_page_props("/a.png");
        zero_width["imageWidth"] = json!(0);
        let mut no_image = sample_page_props("/a.png");
        assert!(
            no_image
                .as_object_mut()
                .expect("props object")
                .remove("imageSrc")
                .is_some()
        );
        let mut bad_caption = sample_page_props("/a.png");
        bad_caption["initialCaptions"][0]["width"] = json!("wide");

        for props in [no_captions, zero_width, no_image, bad_caption] {
            let result = parse_template_page(&next_data_page(&props), "t1");
            assert!(
                matches!(result, Err(MemeError::InvalidTemplateSchema(_))),
                "{props} gave {result:?}"
            );
        }

        for json in [r#"{"props":{}}"#, r#"{"props": {"pageProps": null}}"#, "not json"] {
            assert!(matches!(
                parse_page_state(json),
                Err(MemeError::InvalidTemplateSchema(_))
            ));
        }
    }
}
