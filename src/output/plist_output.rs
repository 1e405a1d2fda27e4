//! Binary property-list serialization
//!
//! The webarchive format is a binary plist with a fixed dictionary shape:
//! a `WebMainResource` dictionary (URL, data, MIME type, text encoding,
//! frame name) and a `WebSubresources` array of smaller dictionaries
//! (URL, data, MIME type).

use crate::archive::{WebArchive, WebArchiveResource};
use crate::output::{ArchiveSerializer, OutputResult};
use plist::{Dictionary, Value};
use std::io::Cursor;

const MAIN_RESOURCE_KEY: &str = "WebMainResource";
const SUBRESOURCES_KEY: &str = "WebSubresources";
const URL_KEY: &str = "WebResourceURL";
const DATA_KEY: &str = "WebResourceData";
const MIME_TYPE_KEY: &str = "WebResourceMIMEType";
const TEXT_ENCODING_KEY: &str = "WebResourceTextEncodingName";
const FRAME_NAME_KEY: &str = "WebResourceFrameName";

/// Serializes archives into binary property-list bytes
#[derive(Debug, Default)]
pub struct BinaryPlistSerializer;

impl ArchiveSerializer for BinaryPlistSerializer {
    fn serialize(&self, archive: &WebArchive) -> OutputResult<Vec<u8>> {
        let mut root = Dictionary::new();
        root.insert(
            MAIN_RESOURCE_KEY.to_string(),
            main_resource_value(&archive.main_resource),
        );
        root.insert(
            SUBRESOURCES_KEY.to_string(),
            Value::Array(archive.subresources.iter().map(resource_value).collect()),
        );

        let mut buffer = Cursor::new(Vec::new());
        Value::Dictionary(root).to_writer_binary(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

fn resource_dictionary(resource: &WebArchiveResource) -> Dictionary {
    let mut dictionary = Dictionary::new();
    dictionary.insert(URL_KEY.to_string(), Value::String(resource.url.to_string()));
    dictionary.insert(DATA_KEY.to_string(), Value::Data(resource.data.clone()));
    dictionary.insert(
        MIME_TYPE_KEY.to_string(),
        Value::String(resource.mime_type.clone()),
    );
    dictionary
}

fn resource_value(resource: &WebArchiveResource) -> Value {
    Value::Dictionary(resource_dictionary(resource))
}

// The main resource carries two extra fields required by the format: a
// fixed "UTF-8" text encoding name and an empty frame name.
fn main_resource_value(resource: &WebArchiveResource) -> Value {
    let mut dictionary = resource_dictionary(resource);
    dictionary.insert(
        TEXT_ENCODING_KEY.to_string(),
        Value::String("UTF-8".to_string()),
    );
    dictionary.insert(FRAME_NAME_KEY.to_string(), Value::String(String::new()));
    Value::Dictionary(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveAssembler;
    use crate::extract::ResourceKind;
    use std::io::Cursor;
    use url::Url;

    fn sample_archive() -> WebArchive {
        let mut assembler = ArchiveAssembler::new();
        assembler.set_main(WebArchiveResource::new(
            Url::parse("https://example.com/").unwrap(),
            b"<html></html>".to_vec(),
            ResourceKind::Document,
        ));
        assembler.add_subresource(WebArchiveResource::new(
            Url::parse("https://example.com/main.css").unwrap(),
            b"body {}".to_vec(),
            ResourceKind::Stylesheet,
        ));
        assembler.build().unwrap()
    }

    #[test]
    fn test_serialized_archive_decodes_with_expected_shape() {
        let data = BinaryPlistSerializer.serialize(&sample_archive()).unwrap();
        assert!(!data.is_empty());

        let value = Value::from_reader(Cursor::new(data)).unwrap();
        let root = value.as_dictionary().unwrap();

        let main = root
            .get(MAIN_RESOURCE_KEY)
            .and_then(Value::as_dictionary)
            .unwrap();
        assert_eq!(
            main.get(URL_KEY).and_then(Value::as_string),
            Some("https://example.com/")
        );
        assert_eq!(
            main.get(MIME_TYPE_KEY).and_then(Value::as_string),
            Some("text/html")
        );
        assert_eq!(
            main.get(TEXT_ENCODING_KEY).and_then(Value::as_string),
            Some("UTF-8")
        );
        assert_eq!(
            main.get(FRAME_NAME_KEY).and_then(Value::as_string),
            Some("")
        );
        assert_eq!(
            main.get(DATA_KEY).and_then(Value::as_data),
            Some(b"<html></html>".as_slice())
        );

        let subresources = root
            .get(SUBRESOURCES_KEY)
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(subresources.len(), 1);

        let stylesheet = subresources[0].as_dictionary().unwrap();
        assert_eq!(
            stylesheet.get(MIME_TYPE_KEY).and_then(Value::as_string),
            Some("text/css")
        );
        // Subresources never carry the main-resource-only fields.
        assert!(stylesheet.get(TEXT_ENCODING_KEY).is_none());
        assert!(stylesheet.get(FRAME_NAME_KEY).is_none());
    }
}
