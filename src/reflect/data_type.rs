use shadercross_ir::DataType;

use crate::errors::{ConvertError, Result};

/// Maps a reflection type token to its scalar kind and component count.
///
/// Only 1-4 component `float` and `int` types are bindable; any other token
/// is rejected, since guessing would produce silently wrong binding metadata.
pub fn parse_data_type(token: &str) -> Result<(DataType, u32)> {
    let (kind, count) = match token {
        "float" => (DataType::Float, 1),
        "float2" => (DataType::Float, 2),
        "float3" => (DataType::Float, 3),
        "float4" => (DataType::Float, 4),
        "int" => (DataType::Int, 1),
        "int2" => (DataType::Int, 2),
        "int3" => (DataType::Int, 3),
        "int4" => (DataType::Int, 4),
        other => return Err(ConvertError::UnsupportedType(other.to_string())),
    };
    Ok((kind, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_supported_tokens() {
        let cases = [
            ("float", DataType::Float, 1),
            ("float2", DataType::Float, 2),
            ("float3", DataType::Float, 3),
            ("float4", DataType::Float, 4),
            ("int", DataType::Int, 1),
            ("int2", DataType::Int, 2),
            ("int3", DataType::Int, 3),
            ("int4", DataType::Int, 4),
        ];
        for (token, kind, count) in cases {
            assert_eq!(parse_data_type(token).unwrap(), (kind, count), "{token}");
        }
    }

    #[test]
    fn rejects_other_tokens() {
        for token in ["double", "float4x4", "uint", "bool", "Float", ""] {
            let err = parse_data_type(token).unwrap_err();
            assert!(matches!(&err, ConvertError::UnsupportedType(t) if t == token));
        }
    }
}
