//! Best-effort decoding of call arguments against an interface description
//!
//! Deployed contracts carry a JSON interface-description blob mapping each
//! action to an ordered list of typed fields. The renderer uses it to show
//! binary call arguments as structured data. Decoding is strictly
//! best-effort: any malformed blob, unknown field type, short read or
//! trailing garbage yields `None` and the caller falls back to hex. Nothing
//! in this module returns an error or panics on untrusted input.
//!
//! Argument wire format: fields in declaration order; integers little-endian;
//! `string` and `bytes` carry a u32 length prefix.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::name::Name;

/// Parsed interface description.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiDef {
    #[serde(default)]
    structs: Vec<AbiStruct>,
    #[serde(default)]
    actions: Vec<AbiAction>,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiStruct {
    name: String,
    #[serde(default)]
    fields: Vec<AbiField>,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiAction {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

/// Little-endian cursor over the raw argument bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        if end > self.bytes.len() {
            return None;
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    fn u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.take(2)?.try_into().ok()?))
    }

    fn u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

impl AbiDef {
    /// Parses an interface-description blob.
    pub fn parse(blob: &[u8]) -> Option<AbiDef> {
        serde_json::from_slice(blob).ok()
    }

    fn struct_for_action(&self, action: &str) -> Option<&AbiStruct> {
        let type_name = &self.actions.iter().find(|a| a.name == action)?.type_name;
        self.structs.iter().find(|s| &s.name == type_name)
    }

    /// Decodes raw argument bytes for `action` into a structured value.
    ///
    /// `None` on any failure; the renderer owns the hex fallback.
    pub fn try_decode(&self, action: &str, data: &[u8]) -> Option<Value> {
        let record = self.struct_for_action(action)?;
        let mut reader = Reader::new(data);
        let mut out = serde_json::Map::new();

        for field in &record.fields {
            let value = match field.type_name.as_str() {
                "name" => json!(Name(reader.u64()?).to_string()),
                "bool" => json!(reader.u8()? != 0),
                "u8" => json!(reader.u8()?),
                "u16" => json!(reader.u16()?),
                "u32" => json!(reader.u32()?),
                "u64" => json!(reader.u64()?),
                "string" => {
                    let len = reader.u32()? as usize;
                    json!(String::from_utf8(reader.take(len)?.to_vec()).ok()?)
                }
                "bytes" => {
                    let len = reader.u32()? as usize;
                    json!(hex::encode(reader.take(len)?))
                }
                _ => return None,
            };
            out.insert(field.name.clone(), value);
        }

        // Trailing bytes mean the data does not actually match this layout.
        if !reader.is_exhausted() {
            return None;
        }
        Some(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const TOKEN_ABI: &str = r#"{
        "structs": [
            {"name": "transfer", "fields": [
                {"name": "from", "type": "name"},
                {"name": "to", "type": "name"},
                {"name": "quantity", "type": "u64"},
                {"name": "memo", "type": "string"}
            ]}
        ],
        "actions": [{"name": "transfer", "type": "transfer"}]
    }"#;

    fn transfer_args() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend(Name::from_str("alice").unwrap().value().to_le_bytes());
        data.extend(Name::from_str("bob").unwrap().value().to_le_bytes());
        data.extend(1000u64.to_le_bytes());
        data.extend(2u32.to_le_bytes());
        data.extend(b"hi");
        data
    }

    #[test]
    fn test_decodes_well_formed_arguments() {
        let abi = AbiDef::parse(TOKEN_ABI.as_bytes()).unwrap();
        let decoded = abi.try_decode("transfer", &transfer_args()).unwrap();
        assert_eq!(decoded["from"], "alice");
        assert_eq!(decoded["to"], "bob");
        assert_eq!(decoded["quantity"], 1000);
        assert_eq!(decoded["memo"], "hi");
    }

    #[test]
    fn test_unknown_action_is_none() {
        let abi = AbiDef::parse(TOKEN_ABI.as_bytes()).unwrap();
        assert!(abi.try_decode("issue", &transfer_args()).is_none());
    }

    #[test]
    fn test_short_data_is_none() {
        let abi = AbiDef::parse(TOKEN_ABI.as_bytes()).unwrap();
        assert!(abi.try_decode("transfer", &[0x01, 0x02]).is_none());
    }

    #[test]
    fn test_trailing_garbage_is_none() {
        let abi = AbiDef::parse(TOKEN_ABI.as_bytes()).unwrap();
        let mut data = transfer_args();
        data.push(0xff);
        assert!(abi.try_decode("transfer", &data).is_none());
    }

    #[test]
    fn test_unknown_field_type_is_none() {
        let abi = AbiDef::parse(
            br#"{"structs":[{"name":"a","fields":[{"name":"x","type":"float128"}]}],
                 "actions":[{"name":"a","type":"a"}]}"#,
        )
        .unwrap();
        assert!(abi.try_decode("a", &[0u8; 16]).is_none());
    }

    #[test]
    fn test_malformed_blob_is_none() {
        assert!(AbiDef::parse(b"not json").is_none());
        assert!(AbiDef::parse(&[0xde, 0xad]).is_none());
    }

    #[test]
    fn test_invalid_utf8_string_is_none() {
        let abi = AbiDef::parse(
            br#"{"structs":[{"name":"a","fields":[{"name":"s","type":"string"}]}],
                 "actions":[{"name":"a","type":"a"}]}"#,
        )
        .unwrap();
        let mut data = Vec::new();
        data.extend(2u32.to_le_bytes());
        data.extend([0xff, 0xfe]);
        assert!(abi.try_decode("a", &data).is_none());
    }
}
