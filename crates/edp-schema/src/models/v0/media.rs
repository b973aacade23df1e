//! Image, video, audio and document datasets.
//!
//! Most measurements here are required but nullable: the key must be
//! present on the wire, and `null` records that the analysis could not
//! determine the value.

use chrono::{DateTime, Utc};
use edp_core::FileReference;
use serde::{Deserialize, Serialize};

use super::enums::{ImageColorMode, ModificationState, VideoPixelFormat};
use crate::models::required_nullable;
use crate::shape::field;

const UNBOUNDED: f64 = f64::INFINITY;

range_deserializer!(non_negative_width: i64, "width", 0.0, UNBOUNDED);
range_deserializer!(non_negative_height: i64, "height", 0.0, UNBOUNDED);
range_deserializer!(non_negative_dpi_x: f64, "x", 0.0, UNBOUNDED);
range_deserializer!(non_negative_dpi_y: f64, "y", 0.0, UNBOUNDED);
range_deserializer!(brightness: Option<f64>, "brightness", 0.0, 255.0);
range_deserializer!(blurriness: Option<f64>, "blurriness", 0.0, UNBOUNDED);
range_deserializer!(sharpness: Option<f64>, "sharpness", 0.0, UNBOUNDED);
range_deserializer!(brisque: Option<f64>, "brisque", 0.0, UNBOUNDED);
range_deserializer!(noise: Option<f64>, "noise", 0.0, UNBOUNDED);
range_deserializer!(ela_score: Option<f64>, "elaScore", 0.0, UNBOUNDED);

/// Dimensions of a video or image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(deserialize_with = "non_negative_width")]
    pub width: i64,
    #[serde(deserialize_with = "non_negative_height")]
    pub height: i64,
}

describe_record!(Resolution, "Dimensions of a video or image in pixels.", [
    field::<i64>("width", "Width in pixels").with_minimum(0.0),
    field::<i64>("height", "Height in pixels").with_minimum(0.0),
]);

/// Dots per inch on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDPI {
    #[serde(deserialize_with = "non_negative_dpi_x")]
    pub x: f64,
    #[serde(deserialize_with = "non_negative_dpi_y")]
    pub y: f64,
}

describe_record!(ImageDPI, "How many dots per inch an image or video contains on each axis.", [
    field::<f64>("x", "Dots Per Inch (DPI) along the x-axis").with_minimum(0.0),
    field::<f64>("y", "Dots Per Inch (DPI) along the y-axis").with_minimum(0.0),
]);

/// Metadata of a dataset detected to be an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDataSet {
    pub codec: String,
    pub color_mode: ImageColorMode,
    pub resolution: Resolution,
    #[serde(deserialize_with = "required_nullable")]
    pub dpi: Option<ImageDPI>,
    #[serde(deserialize_with = "brightness")]
    pub brightness: Option<f64>,
    #[serde(deserialize_with = "blurriness")]
    pub blurriness: Option<f64>,
    #[serde(deserialize_with = "sharpness")]
    pub sharpness: Option<f64>,
    #[serde(deserialize_with = "brisque")]
    pub brisque: Option<f64>,
    #[serde(deserialize_with = "noise")]
    pub noise: Option<f64>,
    #[serde(deserialize_with = "required_nullable")]
    pub low_contrast: Option<bool>,
    #[serde(deserialize_with = "ela_score")]
    pub ela_score: Option<f64>,
}

describe_record!(ImageDataSet, "Metadata for all datasets detected to be images.", [
    field::<String>("codec", "The format codec of the image, such as JPEG or PNG"),
    field::<ImageColorMode>(
        "colorMode",
        "Color mode of the image, such as RGB, CMYK, Grayscale, etc.",
    ),
    field::<Resolution>("resolution", "Dimensions of the image in pixels"),
    field::<Option<ImageDPI>>(
        "dpi",
        "Dots Per Inch (DPI) represents the image's print resolution. Not all images have this property.",
    ),
    field::<Option<f64>>(
        "brightness",
        "Average brightness of the image, higher values indicate brighter images",
    )
    .with_range(0.0, 255.0),
    field::<Option<f64>>(
        "blurriness",
        "Measure of the image blurriness, with higher values indicating more blur",
    )
    .with_minimum(0.0),
    field::<Option<f64>>(
        "sharpness",
        "Measure of the image sharpness, indicating the clarity of detail",
    )
    .with_minimum(0.0),
    field::<Option<f64>>(
        "brisque",
        "No-reference metric for assessing perceived quality of an image, with lower scores typically indicating better quality",
    )
    .with_minimum(0.0),
    field::<Option<f64>>(
        "noise",
        "Estimated absolute level of random variations (noise) in the image pixel intensities",
    )
    .with_minimum(0.0),
    field::<Option<bool>>("lowContrast", "Boolean indicator of whether the image is low contrast"),
    field::<Option<f64>>(
        "elaScore",
        "Computed Error Level Analysis (ELA) score: the average pixel intensity difference between the original image and its recompressed version",
    )
    .with_minimum(0.0),
]);

/// Metadata of a dataset detected to be a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDataSet {
    pub codec: String,
    #[serde(deserialize_with = "required_nullable")]
    pub resolution: Option<Resolution>,
    #[serde(deserialize_with = "required_nullable")]
    pub fps: Option<f64>,
    /// Duration in seconds.
    #[serde(deserialize_with = "required_nullable")]
    pub duration: Option<f64>,
    pub pixel_format: VideoPixelFormat,
}

describe_record!(VideoDataSet, "Metadata for all datasets detected to be videos.", [
    field::<String>("codec", "The format codec of the video, such as H264 or HEVC"),
    field::<Option<Resolution>>("resolution", "Dimensions of the video in pixels"),
    field::<Option<f64>>("fps", "Frames per second of the video"),
    field::<Option<f64>>("duration", "Duration of the video in seconds"),
    field::<VideoPixelFormat>("pixelFormat", "Pixel format of the video"),
]);

/// Metadata of a dataset detected to be audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDataSet {
    pub codec: String,
    pub channels: i64,
    /// Duration in seconds.
    #[serde(deserialize_with = "required_nullable")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "required_nullable")]
    pub sample_rate: Option<i64>,
    #[serde(deserialize_with = "required_nullable")]
    pub bit_rate: Option<i64>,
    #[serde(deserialize_with = "required_nullable")]
    pub bits_per_sample: Option<i64>,
    pub spectrogram: FileReference,
}

describe_record!(AudioDataSet, "Metadata for all datasets detected to be audios.", [
    field::<String>("codec", "Codec of the audio, such as MP3"),
    field::<i64>("channels", "Number of audio channels"),
    field::<Option<f64>>("duration", "Duration of the audio in seconds"),
    field::<Option<i64>>("sampleRate", "Number of samples per second"),
    field::<Option<i64>>("bitRate", "Bits per second in the encoded file"),
    field::<Option<i64>>("bitsPerSample", "Bits per sample"),
    field::<FileReference>(
        "spectrogram",
        "Link to the spectrogram representing the frequency distribution over time",
    ),
]);

/// Metadata of a document (PDF and similar formats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDataSet {
    #[serde(deserialize_with = "required_nullable")]
    pub title: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub author: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub toolchain: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "required_nullable")]
    pub modification_date: Option<DateTime<Utc>>,
    pub keywords: Vec<String>,
    pub doc_type: String,
    #[serde(deserialize_with = "required_nullable")]
    pub num_pages: Option<i64>,
    pub num_images: i64,
    pub modified: ModificationState,
    pub encrypted: bool,
}

describe_record!(DocumentDataSet, "Document dataset. Used for PDF and other formats.", [
    field::<Option<String>>("title", "The document's title"),
    field::<Option<String>>("subject", "The subject of the document"),
    field::<Option<String>>("author", "The name of the person who created the document"),
    field::<Option<String>>(
        "toolchain",
        "The name of the application that created the original document or converted it",
    ),
    field::<Option<DateTime<Utc>>>("creationDate", "The date and time the document was created"),
    field::<Option<DateTime<Utc>>>(
        "modificationDate",
        "The date and time the document was most recently modified",
    ),
    field::<Vec<String>>("keywords", "Keywords associated with the document"),
    field::<String>("docType", "Document type, e.g. PDF-1.6"),
    field::<Option<i64>>("numPages", "Number of pages in the document"),
    field::<i64>("numImages", "Number of images in the document"),
    field::<ModificationState>(
        "modified",
        "Whether a document was detected to have been modified since its creation",
    ),
    field::<bool>("encrypted", "Encrypted"),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image() -> serde_json::Value {
        json!({
            "codec": "PNG",
            "colorMode": "RGB",
            "resolution": {"width": 640, "height": 480},
            "dpi": {"x": 72.0, "y": 72.0},
            "brightness": 120.5,
            "blurriness": 3.2,
            "sharpness": 10.0,
            "brisque": 22.1,
            "noise": 0.4,
            "lowContrast": false,
            "elaScore": 1.7
        })
    }

    #[test]
    fn test_image_accepts_nulls_for_measurements() {
        let mut doc = image();
        for key in [
            "dpi", "brightness", "blurriness", "sharpness", "brisque", "noise", "lowContrast",
            "elaScore",
        ] {
            doc[key] = json!(null);
        }
        let image: ImageDataSet = serde_json::from_value(doc).unwrap();
        assert!(image.brightness.is_none());
        assert_eq!(image.resolution, Resolution { width: 640, height: 480 });
    }

    #[test]
    fn test_image_requires_measurement_keys() {
        for key in ["dpi", "brightness", "lowContrast", "elaScore"] {
            let mut doc = image();
            doc.as_object_mut().unwrap().remove(key);
            let err = serde_json::from_value::<ImageDataSet>(doc).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn test_image_bounds() {
        let mut doc = image();
        doc["brightness"] = json!(255.5);
        let err = serde_json::from_value::<ImageDataSet>(doc).unwrap_err();
        assert!(err.to_string().contains("brightness"), "{err}");

        let mut doc = image();
        doc["noise"] = json!(-0.1);
        assert!(serde_json::from_value::<ImageDataSet>(doc).is_err());

        let mut doc = image();
        doc["brightness"] = json!(255.0);
        serde_json::from_value::<ImageDataSet>(doc).unwrap();
    }

    #[test]
    fn test_resolution_and_dpi_are_non_negative() {
        assert!(serde_json::from_value::<Resolution>(json!({"width": -1, "height": 1})).is_err());
        assert!(serde_json::from_value::<ImageDPI>(json!({"x": 1.0, "y": -0.5})).is_err());
        serde_json::from_value::<Resolution>(json!({"width": 0, "height": 0})).unwrap();
    }

    #[test]
    fn test_video_and_audio() {
        let video: VideoDataSet = serde_json::from_value(json!({
            "codec": "H264",
            "resolution": null,
            "fps": 29.97,
            "duration": 12.5,
            "pixelFormat": "yuv420p"
        }))
        .unwrap();
        assert_eq!(video.pixel_format, VideoPixelFormat::Yuv420p);

        let err = serde_json::from_value::<AudioDataSet>(json!({
            "codec": "MP3",
            "channels": 2,
            "duration": 3.0,
            "sampleRate": 44100,
            "bitRate": 320000,
            "spectrogram": "audio/spectrogram.png"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("bitsPerSample"), "{err}");
    }

    #[test]
    fn test_document_dates() {
        let doc: DocumentDataSet = serde_json::from_value(json!({
            "title": "Annual Report",
            "subject": null,
            "author": null,
            "toolchain": "LibreOffice",
            "creationDate": "2024-03-01T10:00:00+01:00",
            "modificationDate": null,
            "keywords": ["finance"],
            "docType": "PDF-1.6",
            "numPages": 12,
            "numImages": 3,
            "modified": "unmodified",
            "encrypted": false
        }))
        .unwrap();
        let created = doc.creation_date.unwrap();
        assert_eq!(created.to_rfc3339(), "2024-03-01T09:00:00+00:00");
    }
}
