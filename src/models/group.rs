use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::errors::WorkflowError;

pub const MAX_GROUP_MEMBERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MemberRole {
    Leader,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupMember {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
    pub major: String,
    pub avatar: String,
}

impl GroupMember {
    pub fn new(id: &str, name: &str, role: MemberRole, major: &str) -> Self {
        GroupMember {
            id: id.to_string(),
            name: name.to_string(),
            role,
            major: major.to_string(),
            avatar: avatar_for(name),
        }
    }
}

fn avatar_for(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// A survey team. The leader is always the first member and the roster
/// never grows past [`MAX_GROUP_MEMBERS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub slogan: String,
    pub members: Vec<GroupMember>,
    #[serde(skip)]
    next_member: u32,
}

impl Group {
    pub fn new(id: &str, name: &str, slogan: &str, mut leader: GroupMember) -> Self {
        leader.role = MemberRole::Leader;
        Group {
            id: id.to_string(),
            name: name.to_string(),
            slogan: slogan.to_string(),
            members: vec![leader],
            next_member: 2,
        }
    }

    pub fn leader(&self) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.role == MemberRole::Leader)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_GROUP_MEMBERS
    }

    pub fn capacity_left(&self) -> usize {
        MAX_GROUP_MEMBERS.saturating_sub(self.members.len())
    }

    /// Adds a member with an explicit major; used when seeding a known roster.
    pub fn add_member(&mut self, name: &str, major: &str) -> Result<&GroupMember, WorkflowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkflowError::validation("Enter a student name or id to invite"));
        }
        if self.is_full() {
            return Err(WorkflowError::GroupFull {
                capacity: MAX_GROUP_MEMBERS,
            });
        }

        let id = format!("m{}", self.next_member);
        self.next_member += 1;
        self.members.push(GroupMember::new(&id, name, MemberRole::Member, major));

        let index = self.members.len() - 1;
        Ok(&self.members[index])
    }

    pub fn invite(&mut self, identifier: &str) -> Result<&GroupMember, WorkflowError> {
        self.add_member(identifier, "Unknown major")
    }

    pub fn update_info(&mut self, update: &UpdateGroupRequest) -> Result<(), WorkflowError> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(WorkflowError::validation("Group name is required"));
        }
        self.name = name.to_string();
        self.slogan = update.slogan.trim().to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_self: bool,
}

/// Group discussion log. Append-only; insertion order is display order.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatTranscript {
    pub fn new() -> Self {
        ChatTranscript {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends a message. Blank text is ignored and yields `None`.
    pub fn send(
        &mut self,
        sender: &str,
        text: &str,
        is_self: bool,
        timestamp: DateTime<Utc>,
    ) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            sender: sender.to_string(),
            text: text.to_string(),
            timestamp,
            is_self,
        });
        self.messages.last()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InviteRequest {
    #[validate(length(min = 1, max = 64, message = "Enter a student name or id to invite"))]
    pub identifier: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 64, message = "Group name is required"))]
    pub name: String,
    #[validate(length(max = 200))]
    pub slogan: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub group: Group,
    pub member_count: usize,
    pub capacity: usize,
}

impl From<&Group> for GroupResponse {
    fn from(group: &Group) -> Self {
        GroupResponse {
            group: group.clone(),
            member_count: group.members.len(),
            capacity: MAX_GROUP_MEMBERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn group() -> Group {
        let leader = GroupMember::new("m1", "Li Hua", MemberRole::Member, "Sociology");
        Group::new("g1", "Survey Pioneers", "Go to the grassroots", leader)
    }

    #[test]
    fn the_founder_is_the_only_leader() {
        let mut group = group();
        group.invite("Zhang Wei").unwrap();

        assert_eq!(group.leader().map(|m| m.id.as_str()), Some("m1"));
        let leaders = group.members.iter().filter(|m| m.role == MemberRole::Leader).count();
        assert_eq!(leaders, 1);
    }

    #[test]
    fn sixth_invite_hits_the_capacity_limit() {
        let mut group = group();
        for name in ["Zhang Wei", "Wang Fang", "Li Qiang", "Zhao Min"] {
            group.invite(name).unwrap();
        }
        assert_eq!(group.members.len(), MAX_GROUP_MEMBERS);
        assert_eq!(group.capacity_left(), 0);

        let err = group.invite("Sun Yue").unwrap_err();
        assert_eq!(err, WorkflowError::GroupFull { capacity: 5 });
        assert_eq!(group.members.len(), MAX_GROUP_MEMBERS);
    }

    #[test]
    fn blank_invites_are_refused() {
        let mut group = group();
        assert!(matches!(group.invite("   "), Err(WorkflowError::Validation(_))));
        assert_eq!(group.members.len(), 1);
    }

    #[test]
    fn invited_members_get_an_avatar_and_member_role() {
        let mut group = group();
        let member = group.invite("  wang fang ").unwrap().clone();
        assert_eq!(member.name, "wang fang");
        assert_eq!(member.avatar, "W");
        assert_eq!(member.role, MemberRole::Member);
        assert_eq!(member.id, "m2");
    }

    #[test]
    fn group_name_cannot_be_blanked() {
        let mut group = group();
        let update = UpdateGroupRequest {
            name: "  ".into(),
            slogan: "new".into(),
        };
        assert!(group.update_info(&update).is_err());
        assert_eq!(group.name, "Survey Pioneers");
    }

    #[test]
    fn chat_keeps_append_order_and_skips_blank_text() {
        let mut chat = ChatTranscript::new();
        let start = Utc::now();

        chat.send("Zhang Wei", "Interview on Friday?", false, start);
        assert!(chat.send("Li Hua", "   ", true, start).is_none());
        chat.send("Li Hua", "Friday 2pm at the north gate", true, start + Duration::minutes(5));
        // Earlier timestamp still lands last.
        chat.send("Li Qiang", "I will bring the recorder", false, start - Duration::minutes(1));

        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            ["Interview on Friday?", "Friday 2pm at the north gate", "I will bring the recorder"]
        );
        let ids: Vec<u64> = chat.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let mut chat = ChatTranscript::new();
        chat.send("Li Hua", "ok", true, Utc::now());
        chat.send("Li Hua", "ok", true, Utc::now());
        assert_eq!(chat.messages().len(), 2);
    }
}
