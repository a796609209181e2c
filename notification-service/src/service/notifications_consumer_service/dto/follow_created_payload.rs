use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FollowCreatedPayload {
    pub follower_id: i64,
    pub followee_id: i64,
}
