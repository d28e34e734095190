//! The user a return is submitted by.

use uuid::Uuid;

use api_types::user::UserObject;

use crate::{
    EngineError, ResultEngine,
    validators::{validate_email, validate_guid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserType {
    /// A caseworker submitting on behalf of the licence holder.
    Internal,
    External,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

impl TryFrom<&str> for UserType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            other => Err(EngineError::invalid_field(
                "user.type",
                format!("invalid user type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub external_id: Uuid,
    pub user_type: UserType,
}

impl User {
    pub fn new(email: &str, external_id: &str, is_internal: bool) -> ResultEngine<Self> {
        Ok(Self {
            email: validate_email(email)?,
            external_id: validate_guid(external_id, "user.externalId")?,
            user_type: if is_internal {
                UserType::Internal
            } else {
                UserType::External
            },
        })
    }

    pub fn is_internal(&self) -> bool {
        self.user_type == UserType::Internal
    }
}

impl TryFrom<UserObject> for User {
    type Error = EngineError;

    fn try_from(object: UserObject) -> Result<Self, Self::Error> {
        let user_type = UserType::try_from(object.user_type.as_str())?;
        Self::new(
            &object.email,
            &object.external_id,
            user_type == UserType::Internal,
        )
    }
}

impl From<&User> for UserObject {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            external_id: user.external_id.hyphenated().to_string(),
            user_type: user.user_type.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTERNAL_ID: &str = "f5e5c6a8-9c2b-4b0d-8d5e-0f3c3f1b2a11";

    #[test]
    fn new_stamps_user_type() {
        let user = User::new("mail@example.com", EXTERNAL_ID, true).unwrap();
        assert_eq!(user.user_type, UserType::Internal);
        assert!(user.is_internal());
        let user = User::new("mail@example.com", EXTERNAL_ID, false).unwrap();
        assert_eq!(user.user_type, UserType::External);
    }

    #[test]
    fn new_validates_fields() {
        let err = User::new("not-an-email", EXTERNAL_ID, false).unwrap_err();
        assert_eq!(err.field(), Some("email"));
        let err = User::new("mail@example.com", "1234", false).unwrap_err();
        assert_eq!(err.field(), Some("user.externalId"));
    }

    #[test]
    fn object_conversion() {
        let object = UserObject {
            email: "mail@example.com".to_string(),
            external_id: EXTERNAL_ID.to_string(),
            user_type: "external".to_string(),
        };
        let user = User::try_from(object.clone()).unwrap();
        assert_eq!(UserObject::from(&user), object);

        let object = UserObject {
            user_type: "admin".to_string(),
            ..object
        };
        assert!(User::try_from(object).is_err());
    }
}
