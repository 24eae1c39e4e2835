use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// 群组消息可能不带 userId
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: EventSource,
    pub message: EventMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEvent {
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: EventSource,
}

#[derive(Debug, Deserialize)]
pub struct UnfollowEvent {
    #[serde(default)]
    pub source: EventSource,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    Follow(FollowEvent),
    Unfollow(UnfollowEvent),
    #[serde(other)]
    Unsupported,
}

impl WebhookEvent {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::Message(e) => e.source.user_id.as_deref(),
            WebhookEvent::Follow(e) => e.source.user_id.as_deref(),
            WebhookEvent::Unfollow(e) => e.source.user_id.as_deref(),
            WebhookEvent::Unsupported => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_message() {
        let raw = r#"{
            "destination": "Uxxxxxxxx",
            "events": [{
                "type": "message",
                "mode": "active",
                "timestamp": 1462629479859,
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "source": {"type": "user", "userId": "U4af4980629"},
                "message": {"id": "325708", "type": "text", "text": "ABC234"}
            }]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.events.len(), 1);
        match &payload.events[0] {
            WebhookEvent::Message(event) => {
                assert_eq!(event.reply_token.as_deref(), Some("nHuyWiB7yP5Zw52FIkcQobQuGDXCTA"));
                assert!(matches!(&event.message, EventMessage::Text { text } if text == "ABC234"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(payload.events[0].user_id(), Some("U4af4980629"));
    }

    #[test]
    fn test_parse_follow_unfollow_and_unknown() {
        let raw = r#"{"events": [
            {"type": "follow", "replyToken": "r1", "source": {"type": "user", "userId": "U1"}},
            {"type": "unfollow", "source": {"type": "user", "userId": "U2"}},
            {"type": "postback", "replyToken": "r3", "postback": {"data": "x"}},
            {"type": "message", "replyToken": "r4", "source": {"type": "user", "userId": "U4"},
             "message": {"id": "1", "type": "sticker", "packageId": "1", "stickerId": "1"}}
        ]}"#;
        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        assert!(matches!(payload.events[0], WebhookEvent::Follow(_)));
        assert!(matches!(payload.events[1], WebhookEvent::Unfollow(_)));
        assert!(matches!(payload.events[2], WebhookEvent::Unsupported));
        match &payload.events[3] {
            WebhookEvent::Message(event) => assert!(matches!(event.message, EventMessage::Other)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_empty_verification_payload() {
        // 控制台“Verify”按钮发送空事件列表
        let payload: WebhookPayload = serde_json::from_str(r#"{"destination":"U0","events":[]}"#).unwrap();
        assert!(payload.events.is_empty());
    }
}
