//! Fixture identities
//!
//! The fixed set of accounts the runner logs in as. Immutable once loaded.

use uuid::{uuid, Uuid};

/// Minimum identities the runner needs: room owner, peer and an outsider
pub const MIN_IDENTITIES: usize = 3;

/// A test account known to the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    pub email: String,
    /// Server-assigned user identifier
    pub user_id: Uuid,
}

impl TestIdentity {
    pub fn new(email: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            email: email.into(),
            user_id,
        }
    }
}

/// Ordered, immutable list of fixture identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identities(Vec<TestIdentity>);

impl Identities {
    /// Create a fixture set
    ///
    /// # Errors
    /// Returns a reason if fewer than three identities are given or an email repeats
    pub fn new(identities: Vec<TestIdentity>) -> Result<Self, String> {
        if identities.len() < MIN_IDENTITIES {
            return Err(format!(
                "expected at least {MIN_IDENTITIES} identities, got {}",
                identities.len()
            ));
        }

        for (i, identity) in identities.iter().enumerate() {
            if identities[..i]
                .iter()
                .any(|other| other.email.eq_ignore_ascii_case(&identity.email))
            {
                return Err(format!("duplicate identity {}", identity.email));
            }
        }

        Ok(Self(identities))
    }

    /// Parse `email=uuid,email=uuid,...`
    ///
    /// # Errors
    /// Returns a reason describing the first malformed entry
    pub fn parse(value: &str) -> Result<Self, String> {
        let identities = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (email, user_id) = entry
                    .split_once('=')
                    .ok_or_else(|| format!("expected email=uuid, got {entry}"))?;
                let email = email.trim();
                if !email.contains('@') {
                    return Err(format!("invalid email {email}"));
                }
                let user_id = Uuid::parse_str(user_id.trim())
                    .map_err(|e| format!("invalid user id for {email}: {e}"))?;
                Ok(TestIdentity::new(email, user_id))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Self::new(identities)
    }

    /// Room creator
    #[must_use]
    pub fn owner(&self) -> &TestIdentity {
        &self.0[0]
    }

    /// Second room member, the room's acceptor
    #[must_use]
    pub fn peer(&self) -> &TestIdentity {
        &self.0[1]
    }

    /// Identity that never joins the room
    #[must_use]
    pub fn outsider(&self) -> &TestIdentity {
        &self.0[2]
    }

    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&TestIdentity> {
        self.0
            .iter()
            .find(|identity| identity.email.eq_ignore_ascii_case(email))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestIdentity> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Identities {
    fn default() -> Self {
        Self(vec![
            TestIdentity::new(
                "demir.hoogerwerf@kpnmail.nl",
                uuid!("19128500-44dd-4f43-af2e-d029e818570e"),
            ),
            TestIdentity::new(
                "eddie.rose@gmail.com",
                uuid!("db3734b0-5547-4386-aa3f-d7255bdd3152"),
            ),
            TestIdentity::new(
                "elio.arnaud@outlook.com",
                uuid!("da979770-a98b-4868-8bd9-a7a3e4c5520a"),
            ),
            TestIdentity::new(
                "bronislava.gordiienko@email.ua",
                uuid!("f69f6282-484b-4aca-b2d9-1ebd6c34415b"),
            ),
            TestIdentity::new(
                "ege.adivar@yahoo.com.tr",
                uuid!("f73d1253-c9af-4d69-a9c9-6cbff214814d"),
            ),
            TestIdentity::new(
                "vickie.harris@gmail.com",
                uuid!("083b0e11-c3a6-4054-b01e-1253ff797fc8"),
            ),
        ])
    }
}
