//! Closed enumerations of the v0 catalog.

string_enum! {
    AssetProcessingStatus ("Marks what kind of data an asset contains. The rough order of operations is: Original Data -> Processed Data -> Refined Data -> AI/ML Result Data.") {
        OriginalData => "Original Data",
        ProcessedData => "Processed Data",
        RefinedData => "Refined Data",
        AiMlResultData => "AI/ML Result Data",
    }
}

impl Default for AssetProcessingStatus {
    fn default() -> Self {
        Self::OriginalData
    }
}

string_enum! {
    AssetTransferType ("Whether an asset was statically uploaded once or gets updated/inflated on a regular basis.") {
        Static => "static",
        Inflationary => "inflationary",
    }
}

string_enum! {
    AssetGrowthRate ("Rate at which an asset grows.") {
        BytesPerDay => "Bytes/day",
        KiloBytesPerDay => "KiloBytes/day",
        MegaBytesPerDay => "MegaBytes/day",
        GigaBytesPerDay => "GigaBytes/day",
        TeraBytesPerDay => "TeraBytes/day",
        PetaBytesPerDay => "PetaBytes/day",
    }
}

string_enum! {
    AssetUpdatePeriod ("Describes how often an asset is updated.") {
        Static => "static",
        Second => "updates by second",
        Minute => "updates by minute",
        Hour => "updates by hour",
        Day => "updates by day",
    }
}

string_enum! {
    AssetImmutability ("Whether the data set can be modified in the given data spaces.") {
        Immutable => "immutable",
        Mutable => "mutable",
    }
}

string_enum! {
    DataSetType ("Semantic type of a dataset.") {
        Archive => "archive",
        Structured => "structured",
        SemiStructured => "semiStructured",
        UnstructuredText => "unstructuredText",
        Image => "image",
        Video => "video",
        Audio => "audio",
        Documents => "documents",
    }
}

string_enum! {
    DataSetCompression ("Compression applied to a dataset.") {
        Uncompressed => "None",
        Gzip => "gzip",
        Zip => "zip",
        TarGz => "tar.gz",
        SevenZip => "7zip",
    }
}

string_enum! {
    Trend ("Whether the series has a trend over time.") {
        NoTrend => "No Trend",
        Increasing => "Increasing",
        Decreasing => "Decreasing",
    }
}

string_enum! {
    ImageColorMode ("Color mode of the image, such as RGB, CMYK, Grayscale, etc.") {
        BlackAndWhite => "1",
        Grayscale => "L",
        Paletted => "P",
        Rgb => "RGB",
        Rgba => "RGBA",
        Cmyk => "CMYK",
        YCbCr => "YCbCr",
        Lab => "LAB",
        Hsv => "HSV",
        /// 32-bit signed integer pixels.
        Integer => "I",
        /// 32-bit floating point pixels.
        Float => "F",
    }
}

string_enum! {
    VideoPixelFormat ("The format in which the single pixels are stored inside the video.") {
        Yuv420p => "yuv420p",
        Yuv422p => "yuv422p",
        Yuv444p => "yuv444p",
        Nv12 => "nv12",
        Gray => "gray",
        Rgb24 => "rgb24",
        Bgr24 => "bgr24",
        Yuvj420p => "yuvj420p",
        Yuvj422p => "yuvj422p",
        Yuvj444p => "yuvj444p",
        Unknown => "unknown",
    }
}

string_enum! {
    ModificationState ("Whether a document was detected to have been modified since its creation.") {
        Modified => "modified",
        Unmodified => "unmodified",
        Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Describe, TypeShape};

    #[test]
    fn test_wire_values_round_trip_through_serde() {
        for status in AssetProcessingStatus::ALL {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, serde_json::Value::String(status.as_str().to_string()));
            let back: AssetProcessingStatus = serde_json::from_value(wire).unwrap();
            assert_eq!(back, *status);
        }
    }

    #[test]
    fn test_unusual_wire_values() {
        assert_eq!(DataSetCompression::Uncompressed.as_str(), "None");
        assert_eq!(ImageColorMode::BlackAndWhite.as_str(), "1");
        assert_eq!("tar.gz".parse::<DataSetCompression>().unwrap(), DataSetCompression::TarGz);
        assert_eq!(
            "AI/ML Result Data".parse::<AssetProcessingStatus>().unwrap(),
            AssetProcessingStatus::AiMlResultData
        );
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "sideways".parse::<Trend>().unwrap_err();
        assert_eq!(err.to_string(), "'sideways' is not a valid Trend");
        assert!(serde_json::from_str::<Trend>("\"increasing\"").is_err());
    }

    #[test]
    fn test_default_processing_status() {
        assert_eq!(AssetProcessingStatus::default(), AssetProcessingStatus::OriginalData);
    }

    #[test]
    fn test_describe_lists_wire_values() {
        let TypeShape::Enum(shape) = DataSetType::shape() else {
            panic!("DataSetType should describe an enum");
        };
        assert_eq!(shape.name, "DataSetType");
        assert_eq!(shape.values.len(), DataSetType::ALL.len());
        assert!(shape.values.contains(&"semiStructured"));
    }
}
