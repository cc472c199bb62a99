//! Protobuf codec using `prost`.
//!
//! # Example
//!
//! ```
//! use elarian::codec::ProtoCodec;
//! use elarian::proto::StringValue;
//!
//! let encoded = ProtoCodec::encode(&StringValue::new("hello"));
//! let decoded: StringValue = ProtoCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded.value, "hello");
//! ```

use bytes::Bytes;
use prost::Message;

use crate::error::Result;

/// Protobuf codec for envelopes and their payloads.
pub struct ProtoCodec;

impl ProtoCodec {
    /// Encode a message into a frame payload.
    #[inline]
    pub fn encode<M: Message>(message: &M) -> Bytes {
        Bytes::from(message.encode_to_vec())
    }

    /// Decode a frame payload.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a valid encoding of `M`.
    #[inline]
    pub fn decode<M: Message + Default>(bytes: &[u8]) -> Result<M> {
        Ok(M::decode(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElarianError;
    use crate::proto::{
        app_to_server_command, data_map_value, AppConnectionMetadata, AppToServerCommand,
        CustomerNumber, CustomerTarget, DataMapValue, GetCustomerStateCommand, StringValue,
    };

    #[test]
    fn test_encode_decode_connection_metadata() {
        let metadata = AppConnectionMetadata {
            org_id: "org".to_string(),
            app_id: "app".to_string(),
            api_key: Some(StringValue::new("key")),
            auth_token: None,
            simplex_mode: true,
            simulator_mode: false,
        };

        let encoded = ProtoCodec::encode(&metadata);
        let decoded: AppConnectionMetadata = ProtoCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn test_oneof_survives_envelope() {
        let command = AppToServerCommand {
            entry: Some(app_to_server_command::Entry::GetCustomerState(
                GetCustomerStateCommand {
                    customer: Some(CustomerTarget::CustomerNumber(CustomerNumber {
                        number: "+254700000000".to_string(),
                        provider: 2,
                        partition: None,
                    })),
                },
            )),
        };

        let decoded: AppToServerCommand = ProtoCodec::decode(&ProtoCodec::encode(&command)).unwrap();
        match decoded.entry {
            Some(app_to_server_command::Entry::GetCustomerState(cmd)) => match cmd.customer {
                Some(CustomerTarget::CustomerNumber(number)) => {
                    assert_eq!(number.number, "+254700000000")
                }
                other => panic!("unexpected target: {other:?}"),
            },
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_bytes_value() {
        let value = DataMapValue {
            value: Some(data_map_value::Value::BytesVal(vec![0, 1, 2, 255])),
        };
        let decoded: DataMapValue = ProtoCodec::decode(&ProtoCodec::encode(&value)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_empty_payload_decodes_to_default() {
        let decoded: AppToServerCommand = ProtoCodec::decode(&[]).unwrap();
        assert!(decoded.entry.is_none());
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<AppConnectionMetadata> = ProtoCodec::decode(&[0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(ElarianError::Decode(_))));
    }
}
