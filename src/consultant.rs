//! Consultant roster entries. Read-only to the booking path; only active
//! consultants accept new bookings, but existing appointments still resolve
//! against an inactive one.

use crate::utils;

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Consultant {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub specialization: String,
    #[n(3)]
    pub is_active: bool,
}

impl Consultant {
    pub fn new(name: &str, specialization: &str) -> anyhow::Result<Self> {
        let id = utils::mint_id("cons_")?;

        Ok(Self {
            id,
            name: name.to_owned(),
            specialization: specialization.to_owned(),
            is_active: true,
        })
    }
}
