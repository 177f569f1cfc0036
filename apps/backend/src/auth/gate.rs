//! Per-route ownership policy.
//!
//! Every user-scoped route has exactly one [`RoutePolicy`] in [`POLICIES`].
//! Handlers hand the gate the ids they parsed from the path and body; the gate
//! compares them with the authenticated user id and never touches a store.

use std::collections::HashMap;

use crate::auth::claims::UserId;
use crate::auth::error::AuthError;

/// User-scoped routes known to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    AuthMe,
    ProfileCreate,
    ProfileRead,
    ProfileUpdate,
    ProfileDelete,
    ProfileDiscover,
    MatchCreate,
    ReportCreate,
    BlockCreate,
    BlockList,
}

impl RouteId {
    pub const ALL: [RouteId; 10] = [
        RouteId::AuthMe,
        RouteId::ProfileCreate,
        RouteId::ProfileRead,
        RouteId::ProfileUpdate,
        RouteId::ProfileDelete,
        RouteId::ProfileDiscover,
        RouteId::MatchCreate,
        RouteId::ReportCreate,
        RouteId::BlockCreate,
        RouteId::BlockList,
    ];
}

/// Where a route carries a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Path(&'static str),
    Body(&'static str),
}

impl IdSource {
    pub fn field(&self) -> &'static str {
        match self {
            IdSource::Path(name) | IdSource::Body(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    pub route: RouteId,
    pub requires_auth: bool,
    /// Field naming the resource owner (the actor on self-scoped routes).
    pub owner: Option<IdSource>,
    /// When false, `owner` must equal the authenticated user.
    pub allow_cross_user: bool,
    /// Second party of a two-party action; must differ from the actor.
    pub counterparty: Option<IdSource>,
    pub forbidden_message: &'static str,
    pub self_reference_message: &'static str,
}

const fn policy(route: RouteId) -> RoutePolicy {
    RoutePolicy {
        route,
        requires_auth: true,
        owner: None,
        allow_cross_user: false,
        counterparty: None,
        forbidden_message: "Forbidden",
        self_reference_message: "Invalid self reference",
    }
}

pub const POLICIES: [RoutePolicy; 10] = [
    policy(RouteId::AuthMe),
    // The owner is always the token subject; a body userId is never consulted.
    policy(RouteId::ProfileCreate),
    RoutePolicy {
        owner: Some(IdSource::Path("userId")),
        allow_cross_user: true,
        ..policy(RouteId::ProfileRead)
    },
    RoutePolicy {
        owner: Some(IdSource::Path("userId")),
        forbidden_message: "Forbidden: Cannot modify other users' profiles",
        ..policy(RouteId::ProfileUpdate)
    },
    RoutePolicy {
        owner: Some(IdSource::Path("userId")),
        forbidden_message: "Forbidden: Cannot delete other users' profiles",
        ..policy(RouteId::ProfileDelete)
    },
    RoutePolicy {
        allow_cross_user: true,
        ..policy(RouteId::ProfileDiscover)
    },
    RoutePolicy {
        owner: Some(IdSource::Body("userId1")),
        counterparty: Some(IdSource::Body("userId2")),
        forbidden_message: "Forbidden: Cannot create matches for other users",
        self_reference_message: "Cannot match with yourself",
        ..policy(RouteId::MatchCreate)
    },
    RoutePolicy {
        owner: Some(IdSource::Body("reporterId")),
        counterparty: Some(IdSource::Body("reportedUserId")),
        forbidden_message: "Forbidden: Cannot report on behalf of other users",
        self_reference_message: "Cannot report yourself",
        ..policy(RouteId::ReportCreate)
    },
    RoutePolicy {
        owner: Some(IdSource::Body("userId")),
        counterparty: Some(IdSource::Body("blockedUserId")),
        forbidden_message: "Forbidden: Cannot block on behalf of other users",
        self_reference_message: "Cannot block yourself",
        ..policy(RouteId::BlockCreate)
    },
    RoutePolicy {
        owner: Some(IdSource::Path("userId")),
        forbidden_message: "Forbidden: Cannot view other users' block lists",
        ..policy(RouteId::BlockList)
    },
];

pub fn policy_for(route: RouteId) -> &'static RoutePolicy {
    // The table is indexed by declaration order of RouteId.
    &POLICIES[route as usize]
}

/// Ids a request carries, keyed by field name. Empty strings count as absent.
#[derive(Debug, Default, Clone)]
pub struct RequestIds<'a> {
    path: HashMap<&'static str, &'a str>,
    body: HashMap<&'static str, &'a str>,
}

impl<'a> RequestIds<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, name: &'static str, value: &'a str) -> Self {
        self.path.insert(name, value);
        self
    }

    pub fn with_body(mut self, name: &'static str, value: Option<&'a str>) -> Self {
        if let Some(value) = value {
            self.body.insert(name, value);
        }
        self
    }

    /// Trimmed value of `source`, or `None` when absent or blank.
    fn get(&self, source: IdSource) -> Option<&'a str> {
        let found = match source {
            IdSource::Path(name) => self.path.get(name),
            IdSource::Body(name) => self.body.get(name),
        };
        found.map(|value| value.trim()).filter(|value| !value.is_empty())
    }

    /// Present and canonical, or the error naming why not.
    fn user_id(&self, source: IdSource) -> Result<UserId, AuthError> {
        let raw = self
            .get(source)
            .ok_or(AuthError::MissingField(source.field()))?;
        UserId::parse(raw).ok_or(AuthError::InvalidUserId(source.field()))
    }
}

/// Outcome of a permitted request. Ids are parsed, so handlers never re-check them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub actor: Option<UserId>,
    /// Owner field (the actor itself on routes without an owner field).
    pub target: Option<UserId>,
    pub counterparty: Option<UserId>,
    pub is_self: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Evaluate `route`'s policy for `actor` against the ids in the request.
    ///
    /// Order: authentication, owner present, ownership, owner format,
    /// counterparty present, counterparty format, self-reference. Ids are
    /// trimmed and parsed before any comparison.
    pub fn authorize(
        &self,
        route: RouteId,
        actor: Option<&UserId>,
        ids: &RequestIds<'_>,
    ) -> Result<Access, AuthError> {
        let policy = policy_for(route);

        let actor = match actor {
            Some(actor) => actor,
            None if policy.requires_auth => return Err(AuthError::MalformedHeader),
            None => {
                return Ok(Access {
                    actor: None,
                    target: None,
                    counterparty: None,
                    is_self: false,
                })
            }
        };

        // Ownership is decided on the trimmed value before its grammar, so a
        // malformed id naming someone else is still a 403 on self-scoped routes.
        let (target, is_self) = match policy.owner {
            Some(source) => {
                let raw = ids
                    .get(source)
                    .ok_or(AuthError::MissingField(source.field()))?;
                let is_self = raw == actor.as_str();
                if !policy.allow_cross_user && !is_self {
                    return Err(AuthError::Forbidden(policy.forbidden_message.to_string()));
                }
                (ids.user_id(source)?, is_self)
            }
            None => (actor.clone(), true),
        };

        let counterparty = match policy.counterparty {
            Some(source) => {
                let other = ids.user_id(source)?;
                if &other == actor {
                    return Err(AuthError::InvalidSelfReference(
                        policy.self_reference_message.to_string(),
                    ));
                }
                Some(other)
            }
            None => None,
        };

        Ok(Access {
            actor: Some(actor.clone()),
            target: Some(target),
            counterparty,
            is_self,
        })
    }
}
