//! Inbound message parts: [`InboundPart`] to and from [`InboundMessageBody`].

use super::enums::{enum_label, enum_value_for_name};
use super::outbound::{
    deserialize_email, deserialize_location, deserialize_media, serialize_email,
    serialize_location, serialize_media,
};
use super::time::{duration_secs, from_timestamp, to_duration, to_timestamp};
use crate::error::Result;
use crate::message::{DialInput, InboundPart, QueueInput, UssdInput, VoiceInput};
use crate::proto::{
    inbound_message_body, CustomerEventDirection, InboundMessageBody, StringValue,
    UssdInputMessageBody, UssdSessionStatus, VoiceCallDialInput, VoiceCallHangupCause,
    VoiceCallInputMessageBody, VoiceCallQueueInput, VoiceCallStatus,
};

/// Build the wire form of the parts a simulated customer sends.
pub fn serialize_parts(parts: &[InboundPart]) -> Result<Vec<InboundMessageBody>> {
    parts.iter().map(serialize_part).collect()
}

fn serialize_part(part: &InboundPart) -> Result<InboundMessageBody> {
    use inbound_message_body::Entry;

    let entry = match part {
        InboundPart::Text(text) => Entry::Text(text.clone()),
        InboundPart::Ussd(ussd) => Entry::Ussd(UssdInputMessageBody {
            status: optional_enum::<UssdSessionStatus>(ussd.status.as_deref())?,
            text: ussd.text.clone().map(StringValue::new),
        }),
        InboundPart::Media(media) => Entry::Media(serialize_media(media)?),
        InboundPart::Location(location) => Entry::Location(serialize_location(location)),
        InboundPart::Email(email) => Entry::Email(serialize_email(email)),
        InboundPart::Voice(voice) => Entry::Voice(serialize_voice(voice)?),
    };
    Ok(InboundMessageBody { entry: Some(entry) })
}

fn optional_enum<E: super::WireEnum>(name: Option<&str>) -> Result<i32> {
    name.map_or(Ok(0), enum_value_for_name::<E>)
}

fn serialize_voice(voice: &VoiceInput) -> Result<VoiceCallInputMessageBody> {
    Ok(VoiceCallInputMessageBody {
        direction: optional_enum::<CustomerEventDirection>(voice.direction.as_deref())?,
        status: optional_enum::<VoiceCallStatus>(voice.status.as_deref())?,
        started_at: voice.started_at.as_ref().map(to_timestamp),
        hangup_cause: optional_enum::<VoiceCallHangupCause>(voice.hangup_cause.as_deref())?,
        dtmf_digits: voice.dtmf_digits.clone().map(StringValue::new),
        recording_url: voice.recording_url.clone().map(StringValue::new),
        dial_data: voice.dial_data.as_ref().map(|dial| VoiceCallDialInput {
            destination_number: dial.destination_number.clone(),
            started_at: dial.started_at.as_ref().map(to_timestamp),
            duration: dial.duration.map(to_duration),
        }),
        queue_data: voice.queue_data.as_ref().map(|queue| VoiceCallQueueInput {
            enqueued_at: queue.enqueued_at.as_ref().map(to_timestamp),
            dequeued_at: queue.dequeued_at.as_ref().map(to_timestamp),
            dequeued_to_number: queue.dequeued_to_number.clone().map(StringValue::new),
            dequeued_to_session_id: queue.dequeued_to_session_id.clone().map(StringValue::new),
            queue_duration: queue.queue_duration.map(to_duration),
        }),
    })
}

/// Read a received part. Empty parts yield `None`.
pub fn deserialize_part(part: &InboundMessageBody) -> Result<Option<InboundPart>> {
    use inbound_message_body::Entry;

    let Some(entry) = part.entry.as_ref() else {
        return Ok(None);
    };
    Ok(Some(match entry {
        Entry::Text(text) => InboundPart::Text(text.clone()),
        Entry::Ussd(ussd) => InboundPart::Ussd(UssdInput {
            status: Some(enum_label::<UssdSessionStatus>(ussd.status)?),
            text: ussd.text.as_ref().map(|v| v.value.clone()),
        }),
        Entry::Media(media) => InboundPart::Media(deserialize_media(media)?),
        Entry::Location(location) => InboundPart::Location(deserialize_location(location)),
        Entry::Email(email) => InboundPart::Email(deserialize_email(email)),
        Entry::Voice(voice) => InboundPart::Voice(deserialize_voice(voice)?),
    }))
}

fn deserialize_voice(voice: &VoiceCallInputMessageBody) -> Result<VoiceInput> {
    Ok(VoiceInput {
        direction: Some(enum_label::<CustomerEventDirection>(voice.direction)?),
        status: Some(enum_label::<VoiceCallStatus>(voice.status)?),
        started_at: voice.started_at.as_ref().and_then(from_timestamp),
        hangup_cause: Some(enum_label::<VoiceCallHangupCause>(voice.hangup_cause)?),
        dtmf_digits: voice.dtmf_digits.as_ref().map(|v| v.value.clone()),
        recording_url: voice.recording_url.as_ref().map(|v| v.value.clone()),
        dial_data: voice.dial_data.as_ref().map(|dial| DialInput {
            destination_number: dial.destination_number.clone(),
            started_at: dial.started_at.as_ref().and_then(from_timestamp),
            duration: dial.duration.as_ref().map(duration_secs),
        }),
        queue_data: voice.queue_data.as_ref().map(|queue| QueueInput {
            enqueued_at: queue.enqueued_at.as_ref().and_then(from_timestamp),
            dequeued_at: queue.dequeued_at.as_ref().and_then(from_timestamp),
            dequeued_to_number: queue.dequeued_to_number.as_ref().map(|v| v.value.clone()),
            dequeued_to_session_id: queue
                .dequeued_to_session_id
                .as_ref()
                .map(|v| v.value.clone()),
            queue_duration: queue.queue_duration.as_ref().map(duration_secs),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElarianError;
    use crate::message::Media;

    #[test]
    fn test_serialize_ussd_part() {
        let parts = serialize_parts(&[InboundPart::Ussd(UssdInput {
            status: Some("active".to_string()),
            text: Some("*384#".to_string()),
        })])
        .unwrap();

        match &parts[0].entry {
            Some(inbound_message_body::Entry::Ussd(ussd)) => {
                assert_eq!(ussd.status, UssdSessionStatus::Active as i32);
                assert_eq!(ussd.text.as_ref().unwrap().value, "*384#");
            }
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_voice_part() {
        let parts = serialize_parts(&[InboundPart::Voice(VoiceInput {
            direction: Some("inbound".to_string()),
            status: Some("queued".to_string()),
            dtmf_digits: Some("12".to_string()),
            ..VoiceInput::default()
        })])
        .unwrap();

        match &parts[0].entry {
            Some(inbound_message_body::Entry::Voice(voice)) => {
                assert_eq!(voice.direction, CustomerEventDirection::Inbound as i32);
                assert_eq!(voice.status, VoiceCallStatus::Queued as i32);
                assert_eq!(voice.hangup_cause, 0);
            }
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_media_type_in_part() {
        let err = serialize_parts(&[InboundPart::Media(Media {
            url: "https://example.com".to_string(),
            media_type: Some("smell".to_string()),
        })])
        .unwrap_err();
        assert!(matches!(err, ElarianError::InvalidKey { .. }));
    }

    #[test]
    fn test_deserialize_text_and_empty_parts() {
        let text = InboundMessageBody {
            entry: Some(inbound_message_body::Entry::Text("hi".to_string())),
        };
        assert_eq!(
            deserialize_part(&text).unwrap(),
            Some(InboundPart::Text("hi".to_string()))
        );
        assert_eq!(deserialize_part(&InboundMessageBody::default()).unwrap(), None);
    }
}
