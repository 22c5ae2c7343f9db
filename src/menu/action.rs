//! Actions bound to menu options

/// What happens when an option fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Move the caller to another menu node
    Navigate { target: String },
    /// Hand the call to a human agent
    Transfer,
    /// Hang up
    EndCall,
    /// Look up the reservation code captured at this node
    Lookup,
}

/// An option's action plus the message spoken when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub message: String,
}

impl Action {
    pub fn navigate(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Navigate {
                target: target.into(),
            },
            message: message.into(),
        }
    }

    pub fn transfer(message: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Transfer,
            message: message.into(),
        }
    }

    pub fn end_call(message: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::EndCall,
            message: message.into(),
        }
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Lookup,
            message: message.into(),
        }
    }
}
