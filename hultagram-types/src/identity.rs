use crate::models::{Comment, Post, User, UserId};

/// Anything that is addressed by a numeric row id.
pub trait Identifiable {
    fn id(&self) -> i64;
}

/// Records that belong to a single user.
pub trait Owned {
    fn owner_id(&self) -> UserId;

    fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id() == user_id
    }
}

impl Identifiable for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identifiable for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identifiable for Comment {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Owned for Post {
    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> UserId {
        self.user_id
    }
}
