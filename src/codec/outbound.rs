//! Outbound messages: [`Message`] to and from [`OutboundMessage`].
//!
//! Voice actions get the server's expected defaults when a field is left
//! unset: a female voice without a beep, `#` as finish key, a one hour cap on
//! recordings and dialled calls, and sequential dialling.

use super::enums::{enum_label, enum_value_for_name};
use super::numbers::{channel_number_from_wire, customer_number, customer_number_from_wire};
use super::time::{duration_secs, to_duration};
use crate::error::{ElarianError, Result};
use crate::message::{
    Dequeue, Dial, Email, Enqueue, GetDigits, GetRecording, Location, Media, Message,
    MessageBody, Play, PromptMenuItem, Redirect, ReplyPrompt, Say, Template, UssdMenu,
    VoiceAction,
};
use crate::proto::{
    outbound_message_body, prompt_message_menu_item_body, voice_call_action, CallPrompt,
    DequeueCallAction, DialCallAction, EmailMessageBody, EnqueueCallAction, GetDigitsCallAction,
    GetRecordingCallAction, Int32Value, LocationMessageBody, MediaMessageBody, MediaType,
    MessagingChannel, MessagingChannelNumber, OutboundMessage, OutboundMessageBody,
    OutboundMessageReplyPrompt, PlayCallAction, PromptMessageMenuItemBody,
    PromptMessageReplyAction, RecordSessionCallAction, RedirectCallAction, RejectCallAction,
    SayCallAction, StringValue, TemplateMessageBody, TextToSpeechVoice, UssdMenuMessageBody,
    VoiceCallAction, VoiceCallDialplanMessageBody,
};

const DEFAULT_FINISH_ON_KEY: &str = "#";
const DEFAULT_MAX_SECONDS: i32 = 3600;

/// Build the wire form of a message, validating every enum name.
pub fn serialize_message(message: &Message) -> Result<OutboundMessage> {
    let reply_prompt = message
        .reply_prompt
        .as_ref()
        .map(serialize_reply_prompt)
        .transpose()?;

    Ok(OutboundMessage {
        body: Some(serialize_body(&message.body)?),
        labels: message.labels.clone(),
        provider_tag: Some(StringValue::new(
            message.provider_tag.clone().unwrap_or_default(),
        )),
        reply_token: Some(StringValue::new(
            message.reply_token.clone().unwrap_or_default(),
        )),
        reply_prompt,
    })
}

fn serialize_reply_prompt(prompt: &ReplyPrompt) -> Result<OutboundMessageReplyPrompt> {
    let action = match prompt.action.as_deref() {
        Some(action) => enum_value_for_name::<PromptMessageReplyAction>(action)?,
        None => PromptMessageReplyAction::Unknown.into(),
    };
    let menu = prompt
        .menu
        .iter()
        .map(|item| -> Result<PromptMessageMenuItemBody> {
            let entry = match item {
                PromptMenuItem::Text(text) => prompt_message_menu_item_body::Entry::Text(text.clone()),
                PromptMenuItem::Media(media) => {
                    prompt_message_menu_item_body::Entry::Media(serialize_media(media)?)
                }
            };
            Ok(PromptMessageMenuItemBody { entry: Some(entry) })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OutboundMessageReplyPrompt { action, menu })
}

fn serialize_body(body: &MessageBody) -> Result<OutboundMessageBody> {
    use outbound_message_body::Entry;

    let entry = match body {
        MessageBody::Text(text) => Entry::Text(text.clone()),
        MessageBody::Url(url) => Entry::Url(url.clone()),
        MessageBody::Ussd(menu) => Entry::Ussd(UssdMenuMessageBody {
            text: menu.text.clone(),
            is_terminal: menu.is_terminal,
        }),
        MessageBody::Media(media) => Entry::Media(serialize_media(media)?),
        MessageBody::Location(location) => Entry::Location(serialize_location(location)),
        MessageBody::Template(template) => Entry::Template(TemplateMessageBody {
            id: template.id.clone(),
            params: template.params.clone(),
        }),
        MessageBody::Email(email) => Entry::Email(serialize_email(email)),
        MessageBody::Voice(actions) => Entry::Voice(VoiceCallDialplanMessageBody {
            actions: actions
                .iter()
                .map(serialize_voice_action)
                .collect::<Result<Vec<_>>>()?,
        }),
    };
    Ok(OutboundMessageBody { entry: Some(entry) })
}

pub(crate) fn serialize_media(media: &Media) -> Result<MediaMessageBody> {
    let media_type = match media.media_type.as_deref() {
        Some(kind) => enum_value_for_name::<MediaType>(kind)?,
        None => MediaType::Unspecified.into(),
    };
    Ok(MediaMessageBody {
        url: media.url.clone(),
        media: media_type,
    })
}

pub(crate) fn serialize_location(location: &Location) -> LocationMessageBody {
    LocationMessageBody {
        latitude: location.latitude,
        longitude: location.longitude,
        label: location.label.clone().map(StringValue::new),
        address: location.address.clone().map(StringValue::new),
    }
}

pub(crate) fn serialize_email(email: &Email) -> EmailMessageBody {
    EmailMessageBody {
        subject: email.subject.clone(),
        body_plain: email.plain.clone(),
        body_html: email.html.clone(),
        cc_list: email.cc.clone(),
        bcc_list: email.bcc.clone(),
        attachments: email.attachments.clone(),
    }
}

fn serialize_say(say: &Say) -> Result<SayCallAction> {
    Ok(SayCallAction {
        text: say.text.clone(),
        play_beep: say.play_beep.unwrap_or(false),
        voice: enum_value_for_name::<TextToSpeechVoice>(say.voice.as_deref().unwrap_or("female"))?,
    })
}

fn serialize_prompt(say: Option<&Say>, play: Option<&Play>) -> Result<Option<CallPrompt>> {
    Ok(match (say, play) {
        (Some(say), _) => Some(CallPrompt::Say(serialize_say(say)?)),
        (None, Some(play)) => Some(CallPrompt::Play(PlayCallAction {
            url: play.url.clone(),
        })),
        (None, None) => None,
    })
}

fn serialize_voice_action(action: &VoiceAction) -> Result<VoiceCallAction> {
    use voice_call_action::Entry;

    let entry = match action {
        VoiceAction::Say(say) => Entry::Say(serialize_say(say)?),
        VoiceAction::Play(play) => Entry::Play(PlayCallAction {
            url: play.url.clone(),
        }),
        VoiceAction::GetDigits(digits) => Entry::GetDigits(GetDigitsCallAction {
            prompt: serialize_prompt(digits.say.as_ref(), digits.play.as_ref())?,
            timeout: Some(to_duration(digits.timeout.unwrap_or(0.0))),
            finish_on_key: Some(StringValue::new(
                digits
                    .finish_on_key
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FINISH_ON_KEY.to_string()),
            )),
            num_digits: digits.num_digits.map(|value| Int32Value { value }),
        }),
        VoiceAction::GetRecording(recording) => Entry::GetRecording(GetRecordingCallAction {
            prompt: serialize_prompt(recording.say.as_ref(), recording.play.as_ref())?,
            timeout: Some(to_duration(recording.timeout.unwrap_or(0.0))),
            max_length: Some(to_duration(
                recording.max_length.unwrap_or(f64::from(DEFAULT_MAX_SECONDS)),
            )),
            finish_on_key: Some(StringValue::new(
                recording
                    .finish_on_key
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FINISH_ON_KEY.to_string()),
            )),
            play_beep: recording.play_beep.unwrap_or(false),
            trim_silence: recording.trim_silence.unwrap_or(true),
        }),
        VoiceAction::Dial(dial) => Entry::Dial(DialCallAction {
            customer_numbers: dial
                .customer_numbers
                .iter()
                .map(customer_number)
                .collect::<Result<Vec<_>>>()?,
            record: dial.record.unwrap_or(false),
            sequential: dial.sequential.unwrap_or(true),
            ringback_tone: dial.ringback_tone.clone().map(StringValue::new),
            caller_id: dial.caller_id.clone().map(StringValue::new),
            max_duration: Some(Int32Value {
                value: dial.max_duration.unwrap_or(DEFAULT_MAX_SECONDS),
            }),
        }),
        VoiceAction::RecordSession => Entry::RecordSession(RecordSessionCallAction {}),
        VoiceAction::Enqueue(enqueue) => Entry::Enqueue(EnqueueCallAction {
            hold_music: enqueue.hold_music.clone().map(StringValue::new),
            queue_name: enqueue.queue_name.clone().map(StringValue::new),
        }),
        VoiceAction::Dequeue(dequeue) => Entry::Dequeue(DequeueCallAction {
            channel_number: dequeue
                .channel_number
                .as_ref()
                .map(|number| -> Result<MessagingChannelNumber> {
                    Ok(MessagingChannelNumber {
                        channel: enum_value_for_name::<MessagingChannel>(&number.channel)?,
                        number: number.number.clone(),
                    })
                })
                .transpose()?,
            record: dequeue.record.unwrap_or(false),
            queue_name: dequeue.queue_name.clone().map(StringValue::new),
        }),
        VoiceAction::Reject => Entry::Reject(RejectCallAction {}),
        VoiceAction::Redirect(redirect) => Entry::Redirect(RedirectCallAction {
            url: redirect.url.clone(),
        }),
    };
    Ok(VoiceCallAction { entry: Some(entry) })
}

/// Read a wire message back, as forwarded to simulators.
///
/// # Errors
///
/// Returns [`ElarianError::Protocol`] for an empty body or an unknown enum value.
pub fn deserialize_message(message: &OutboundMessage) -> Result<Message> {
    let body = message
        .body
        .as_ref()
        .and_then(|body| body.entry.as_ref())
        .ok_or_else(|| ElarianError::Protocol("outbound message without body".to_string()))?;

    let reply_prompt = message
        .reply_prompt
        .as_ref()
        .map(|prompt| -> Result<ReplyPrompt> {
            Ok(ReplyPrompt {
                action: Some(enum_label::<PromptMessageReplyAction>(prompt.action)?),
                menu: prompt
                    .menu
                    .iter()
                    .filter_map(|item| item.entry.as_ref())
                    .map(|entry| -> Result<PromptMenuItem> {
                        Ok(match entry {
                            prompt_message_menu_item_body::Entry::Text(text) => {
                                PromptMenuItem::Text(text.clone())
                            }
                            prompt_message_menu_item_body::Entry::Media(media) => {
                                PromptMenuItem::Media(deserialize_media(media)?)
                            }
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .transpose()?;

    Ok(Message {
        labels: message.labels.clone(),
        provider_tag: non_empty(message.provider_tag.as_ref()),
        reply_token: non_empty(message.reply_token.as_ref()),
        reply_prompt,
        body: deserialize_body(body)?,
    })
}

fn non_empty(value: Option<&StringValue>) -> Option<String> {
    value
        .map(|v| v.value.clone())
        .filter(|value| !value.is_empty())
}

fn deserialize_body(entry: &outbound_message_body::Entry) -> Result<MessageBody> {
    use outbound_message_body::Entry;

    Ok(match entry {
        Entry::Text(text) => MessageBody::Text(text.clone()),
        Entry::Url(url) => MessageBody::Url(url.clone()),
        Entry::Ussd(menu) => MessageBody::Ussd(UssdMenu {
            text: menu.text.clone(),
            is_terminal: menu.is_terminal,
        }),
        Entry::Media(media) => MessageBody::Media(deserialize_media(media)?),
        Entry::Location(location) => MessageBody::Location(deserialize_location(location)),
        Entry::Template(template) => MessageBody::Template(Template {
            id: template.id.clone(),
            params: template.params.clone(),
        }),
        Entry::Email(email) => MessageBody::Email(deserialize_email(email)),
        Entry::Voice(dialplan) => MessageBody::Voice(
            dialplan
                .actions
                .iter()
                .filter_map(|action| action.entry.as_ref())
                .map(deserialize_voice_action)
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}

pub(crate) fn deserialize_media(media: &MediaMessageBody) -> Result<Media> {
    Ok(Media {
        url: media.url.clone(),
        media_type: Some(enum_label::<MediaType>(media.media)?),
    })
}

pub(crate) fn deserialize_location(location: &LocationMessageBody) -> Location {
    Location {
        latitude: location.latitude,
        longitude: location.longitude,
        label: location.label.as_ref().map(|v| v.value.clone()),
        address: location.address.as_ref().map(|v| v.value.clone()),
    }
}

pub(crate) fn deserialize_email(email: &EmailMessageBody) -> Email {
    Email {
        subject: email.subject.clone(),
        plain: email.body_plain.clone(),
        html: email.body_html.clone(),
        cc: email.cc_list.clone(),
        bcc: email.bcc_list.clone(),
        attachments: email.attachments.clone(),
    }
}

fn deserialize_say(say: &SayCallAction) -> Result<Say> {
    Ok(Say {
        text: say.text.clone(),
        voice: Some(enum_label::<TextToSpeechVoice>(say.voice)?),
        play_beep: Some(say.play_beep),
    })
}

fn deserialize_prompt(prompt: Option<&CallPrompt>) -> Result<(Option<Say>, Option<Play>)> {
    Ok(match prompt {
        Some(CallPrompt::Say(say)) => (Some(deserialize_say(say)?), None),
        Some(CallPrompt::Play(play)) => (
            None,
            Some(Play {
                url: play.url.clone(),
            }),
        ),
        None => (None, None),
    })
}

fn deserialize_voice_action(entry: &voice_call_action::Entry) -> Result<VoiceAction> {
    use voice_call_action::Entry;

    Ok(match entry {
        Entry::Say(say) => VoiceAction::Say(deserialize_say(say)?),
        Entry::Play(play) => VoiceAction::Play(Play {
            url: play.url.clone(),
        }),
        Entry::GetDigits(digits) => {
            let (say, play) = deserialize_prompt(digits.prompt.as_ref())?;
            VoiceAction::GetDigits(GetDigits {
                say,
                play,
                timeout: digits.timeout.as_ref().map(duration_secs),
                finish_on_key: digits.finish_on_key.as_ref().map(|v| v.value.clone()),
                num_digits: digits.num_digits.as_ref().map(|v| v.value),
            })
        }
        Entry::GetRecording(recording) => {
            let (say, play) = deserialize_prompt(recording.prompt.as_ref())?;
            VoiceAction::GetRecording(GetRecording {
                say,
                play,
                timeout: recording.timeout.as_ref().map(duration_secs),
                max_length: recording.max_length.as_ref().map(duration_secs),
                finish_on_key: recording.finish_on_key.as_ref().map(|v| v.value.clone()),
                play_beep: Some(recording.play_beep),
                trim_silence: Some(recording.trim_silence),
            })
        }
        Entry::Dial(dial) => VoiceAction::Dial(Dial {
            customer_numbers: dial
                .customer_numbers
                .iter()
                .map(customer_number_from_wire)
                .collect::<Result<Vec<_>>>()?,
            record: Some(dial.record),
            sequential: Some(dial.sequential),
            ringback_tone: dial.ringback_tone.as_ref().map(|v| v.value.clone()),
            caller_id: dial.caller_id.as_ref().map(|v| v.value.clone()),
            max_duration: dial.max_duration.as_ref().map(|v| v.value),
        }),
        Entry::RecordSession(_) => VoiceAction::RecordSession,
        Entry::Enqueue(enqueue) => VoiceAction::Enqueue(Enqueue {
            hold_music: enqueue.hold_music.as_ref().map(|v| v.value.clone()),
            queue_name: enqueue.queue_name.as_ref().map(|v| v.value.clone()),
        }),
        Entry::Dequeue(dequeue) => VoiceAction::Dequeue(Dequeue {
            channel_number: dequeue
                .channel_number
                .as_ref()
                .map(|n| channel_number_from_wire::<MessagingChannel>(n.channel, &n.number))
                .transpose()?,
            record: Some(dequeue.record),
            queue_name: dequeue.queue_name.as_ref().map(|v| v.value.clone()),
        }),
        Entry::Reject(_) => VoiceAction::Reject,
        Entry::Redirect(redirect) => VoiceAction::Redirect(Redirect {
            url: redirect.url.clone(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerNumber;

    fn voice_actions(message: &OutboundMessage) -> Vec<voice_call_action::Entry> {
        match message.body.as_ref().and_then(|b| b.entry.as_ref()) {
            Some(outbound_message_body::Entry::Voice(plan)) => plan
                .actions
                .iter()
                .filter_map(|a| a.entry.clone())
                .collect(),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_text_message() {
        let wire = serialize_message(&Message::text("Hello")).unwrap();
        assert_eq!(
            wire.body.unwrap().entry,
            Some(outbound_message_body::Entry::Text("Hello".to_string()))
        );
        assert_eq!(wire.provider_tag, Some(StringValue::new("")));
        assert!(wire.reply_prompt.is_none());
    }

    #[test]
    fn test_voice_defaults() {
        let message = Message::voice(vec![
            VoiceAction::Say(Say::new("Hi")),
            VoiceAction::GetRecording(GetRecording::default()),
            VoiceAction::Dial(Dial {
                customer_numbers: vec![CustomerNumber::new("+254711000000", "cellular")],
                ..Dial::default()
            }),
        ]);
        let actions = voice_actions(&serialize_message(&message).unwrap());

        match &actions[0] {
            voice_call_action::Entry::Say(say) => {
                assert_eq!(say.voice, TextToSpeechVoice::Female as i32);
                assert!(!say.play_beep);
            }
            other => panic!("unexpected action: {other:?}"),
        }
        match &actions[1] {
            voice_call_action::Entry::GetRecording(recording) => {
                assert_eq!(recording.max_length.as_ref().unwrap().seconds, 3600);
                assert_eq!(recording.finish_on_key.as_ref().unwrap().value, "#");
                assert!(recording.trim_silence);
            }
            other => panic!("unexpected action: {other:?}"),
        }
        match &actions[2] {
            voice_call_action::Entry::Dial(dial) => {
                assert!(dial.sequential);
                assert!(!dial.record);
                assert_eq!(dial.max_duration.as_ref().unwrap().value, 3600);
                assert_eq!(dial.customer_numbers[0].provider, 2);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_media_type() {
        let message = Message::new(MessageBody::Media(Media {
            url: "https://example.com/a.gif".to_string(),
            media_type: Some("hologram".to_string()),
        }));
        let err = serialize_message(&message).unwrap_err();
        assert!(matches!(err, ElarianError::InvalidKey { ref key, .. } if key == "hologram"));
    }

    #[test]
    fn test_reply_prompt_defaults_to_unknown() {
        let mut message = Message::text("Pick one");
        message.reply_prompt = Some(ReplyPrompt {
            action: None,
            menu: vec![PromptMenuItem::Text("yes".to_string())],
        });
        let prompt = serialize_message(&message).unwrap().reply_prompt.unwrap();
        assert_eq!(prompt.action, 0);
        assert_eq!(prompt.menu.len(), 1);
    }

    #[test]
    fn test_deserialize_forwarded_ussd_menu() {
        let wire = serialize_message(&Message::ussd("1. Balance", false)).unwrap();
        let message = deserialize_message(&wire).unwrap();
        assert_eq!(message.body, MessageBody::Ussd(UssdMenu {
            text: "1. Balance".to_string(),
            is_terminal: false,
        }));
        assert!(message.provider_tag.is_none());
    }

    #[test]
    fn test_deserialize_without_body() {
        let err = deserialize_message(&OutboundMessage::default()).unwrap_err();
        assert!(matches!(err, ElarianError::Protocol(_)));
    }
}
