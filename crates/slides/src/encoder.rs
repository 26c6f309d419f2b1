//! Slide operation to `batchUpdate` request encoding.

use docslides_core::{
    Error, ImagePlacement, ImageSource, LayoutArchetype, Result, SlideOperation, TextTarget,
};
use serde_json::{json, Value};

/// Suffix of the title placeholder id mapped on slide creation.
pub const TITLE_PLACEHOLDER_SUFFIX: &str = "_title";

/// Suffix of the body placeholder id mapped on slide creation.
pub const BODY_PLACEHOLDER_SUFFIX: &str = "_body";

/// Encodes [`SlideOperation`]s as Slides API requests.
///
/// Title-and-body slides get client-assigned placeholder ids
/// (`<slide>_title`, `<slide>_body`), so placeholders can be resolved
/// without reading the slide back.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestEncoder;

impl RequestEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a whole batch; fails on the first operation that cannot be
    /// expressed as a request.
    pub fn encode_batch(&self, batch: &[SlideOperation]) -> Result<Vec<Value>> {
        batch.iter().map(|op| self.encode(op)).collect()
    }

    /// Encode one operation.
    pub fn encode(&self, op: &SlideOperation) -> Result<Value> {
        let request = match op {
            SlideOperation::CreateSlide { slide_id, layout } => create_slide(slide_id, *layout),
            SlideOperation::InsertText { target, text } => {
                let mut request = json!({
                    "objectId": target.object_id(),
                    "text": text,
                    "insertionIndex": 0,
                });
                add_cell_location(&mut request, target);
                json!({ "insertText": request })
            }
            SlideOperation::CreateTable {
                table_id,
                slide_id,
                rows,
                columns,
            } => json!({
                "createTable": {
                    "objectId": table_id,
                    "elementProperties": { "pageObjectId": slide_id },
                    "rows": rows,
                    "columns": columns,
                }
            }),
            SlideOperation::CreateImage {
                image_id,
                slide_id,
                source,
                placement,
            } => {
                let ImageSource::Url(url) = source else {
                    return Err(Error::Write {
                        slide: slide_id.clone(),
                        reason: "image bytes cannot be sent in a batch request".to_string(),
                    });
                };
                json!({
                    "createImage": {
                        "objectId": image_id,
                        "url": url,
                        "elementProperties": element_properties(slide_id, placement),
                    }
                })
            }
            SlideOperation::SetFontSize { target, size } => {
                let mut request = json!({
                    "objectId": target.object_id(),
                    "style": { "fontSize": dimension(*size) },
                    "textRange": { "type": "ALL" },
                    "fields": "fontSize",
                });
                add_cell_location(&mut request, target);
                json!({ "updateTextStyle": request })
            }
        };

        log::trace!("Encoded {}", op.name());
        Ok(request)
    }
}

fn create_slide(slide_id: &str, layout: LayoutArchetype) -> Value {
    match layout {
        LayoutArchetype::TitleAndBody => json!({
            "createSlide": {
                "objectId": slide_id,
                "slideLayoutReference": { "predefinedLayout": "TITLE_AND_BODY" },
                "placeholderIdMappings": [
                    {
                        "layoutPlaceholder": { "type": "TITLE", "index": 0 },
                        "objectId": format!("{}{}", slide_id, TITLE_PLACEHOLDER_SUFFIX),
                    },
                    {
                        "layoutPlaceholder": { "type": "BODY", "index": 0 },
                        "objectId": format!("{}{}", slide_id, BODY_PLACEHOLDER_SUFFIX),
                    },
                ],
            }
        }),
        LayoutArchetype::Blank => json!({
            "createSlide": {
                "objectId": slide_id,
                "slideLayoutReference": { "predefinedLayout": "BLANK" },
            }
        }),
    }
}

fn add_cell_location(request: &mut Value, target: &TextTarget) {
    if let TextTarget::TableCell { row, column, .. } = target {
        request["cellLocation"] = json!({ "rowIndex": row, "columnIndex": column });
    }
}

fn element_properties(slide_id: &str, placement: &ImagePlacement) -> Value {
    let mut properties = json!({
        "pageObjectId": slide_id,
        "transform": {
            "scaleX": 1,
            "scaleY": 1,
            "translateX": placement.x,
            "translateY": placement.y,
            "unit": "PT",
        },
    });
    if let (Some(width), Some(height)) = (placement.width, placement.height) {
        properties["size"] = json!({
            "width": dimension(width),
            "height": dimension(height),
        });
    }
    properties
}

fn dimension(magnitude: f64) -> Value {
    json!({ "magnitude": magnitude, "unit": "PT" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_body_slide_maps_placeholders() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::CreateSlide {
                slide_id: "slide_1".into(),
                layout: LayoutArchetype::TitleAndBody,
            })
            .unwrap();

        assert_eq!(
            request,
            json!({
                "createSlide": {
                    "objectId": "slide_1",
                    "slideLayoutReference": { "predefinedLayout": "TITLE_AND_BODY" },
                    "placeholderIdMappings": [
                        { "layoutPlaceholder": { "type": "TITLE", "index": 0 }, "objectId": "slide_1_title" },
                        { "layoutPlaceholder": { "type": "BODY", "index": 0 }, "objectId": "slide_1_body" }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_blank_slide() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::CreateSlide {
                slide_id: "slide_2".into(),
                layout: LayoutArchetype::Blank,
            })
            .unwrap();

        assert_eq!(
            request["createSlide"]["slideLayoutReference"]["predefinedLayout"],
            "BLANK"
        );
        assert!(request["createSlide"].get("placeholderIdMappings").is_none());
    }

    #[test]
    fn test_insert_text_into_cell() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::InsertText {
                target: TextTarget::TableCell {
                    table_id: "table_1".into(),
                    row: 1,
                    column: 2,
                },
                text: "Total".into(),
            })
            .unwrap();

        assert_eq!(
            request,
            json!({
                "insertText": {
                    "objectId": "table_1",
                    "text": "Total",
                    "insertionIndex": 0,
                    "cellLocation": { "rowIndex": 1, "columnIndex": 2 }
                }
            })
        );
    }

    #[test]
    fn test_font_size_on_shape() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::SetFontSize {
                target: TextTarget::Shape("slide_1_body".into()),
                size: 14.0,
            })
            .unwrap();

        let style = &request["updateTextStyle"];
        assert_eq!(style["objectId"], "slide_1_body");
        assert_eq!(style["style"]["fontSize"]["magnitude"], 14.0);
        assert_eq!(style["fields"], "fontSize");
        assert!(style.get("cellLocation").is_none());
    }

    #[test]
    fn test_create_table() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::CreateTable {
                table_id: "table_1".into(),
                slide_id: "slide_1".into(),
                rows: 3,
                columns: 4,
            })
            .unwrap();

        assert_eq!(request["createTable"]["rows"], 3);
        assert_eq!(request["createTable"]["columns"], 4);
        assert_eq!(
            request["createTable"]["elementProperties"]["pageObjectId"],
            "slide_1"
        );
    }

    #[test]
    fn test_create_image_with_size() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::CreateImage {
                image_id: "image_1".into(),
                slide_id: "slide_1".into(),
                source: ImageSource::Url("https://img/1".into()),
                placement: ImagePlacement {
                    x: 100.0,
                    y: 100.0,
                    width: Some(144.0),
                    height: Some(72.0),
                },
            })
            .unwrap();

        let image = &request["createImage"];
        assert_eq!(image["url"], "https://img/1");
        assert_eq!(image["elementProperties"]["transform"]["translateX"], 100.0);
        assert_eq!(image["elementProperties"]["size"]["width"]["magnitude"], 144.0);
        assert_eq!(image["elementProperties"]["size"]["height"]["unit"], "PT");
    }

    #[test]
    fn test_image_without_size_keeps_natural_size() {
        let request = RequestEncoder::new()
            .encode(&SlideOperation::CreateImage {
                image_id: "image_1".into(),
                slide_id: "slide_1".into(),
                source: ImageSource::Url("https://img/1".into()),
                placement: ImagePlacement {
                    x: 100.0,
                    y: 100.0,
                    width: None,
                    height: None,
                },
            })
            .unwrap();

        assert!(request["createImage"]["elementProperties"].get("size").is_none());
    }

    #[test]
    fn test_image_bytes_rejected() {
        let result = RequestEncoder::new().encode_batch(&[SlideOperation::CreateImage {
            image_id: "image_1".into(),
            slide_id: "slide_9".into(),
            source: ImageSource::Bytes(vec![0, 1]),
            placement: ImagePlacement {
                x: 0.0,
                y: 0.0,
                width: None,
                height: None,
            },
        }]);

        match result {
            Err(Error::Write { slide, .. }) => assert_eq!(slide, "slide_9"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
