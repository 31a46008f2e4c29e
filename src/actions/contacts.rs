use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Action, Workspace};

const INPUT: &str = "contacts.json";
const OUTPUT: &str = "contacts-sorted.json";

/// A contact record, kept as parsed so every field and its key order
/// survive the sort.
pub type Contact = Map<String, Value>;

fn name_field<'a>(contact: &'a Contact, index: usize, field: &str) -> Result<&'a str> {
    contact
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("contact {index}: missing string field \"{field}\""))
}

/// Stable sort by `(last_name, first_name)`. Fails if any record lacks
/// either name as a string.
pub fn sort_contacts(contacts: Vec<Contact>) -> Result<Vec<Contact>> {
    let mut keyed = contacts
        .into_iter()
        .enumerate()
        .map(|(i, contact)| {
            let last = name_field(&contact, i, "last_name")?.to_string();
            let first = name_field(&contact, i, "first_name")?.to_string();
            Ok(((last, first), contact))
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, contact)| contact).collect())
}

/// Writes `contacts.json` sorted by last then first name.
pub struct SortContacts;

#[async_trait]
impl Action for SortContacts {
    fn name(&self) -> &str {
        "sort_contacts"
    }

    fn trigger(&self) -> &str {
        "sort contacts"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let text = workspace.read_to_string(INPUT).await?;
        let contacts: Vec<Contact> =
            serde_json::from_str(&text).with_context(|| format!("failed to parse {INPUT}"))?;
        let sorted = sort_contacts(contacts).with_context(|| format!("failed to sort {INPUT}"))?;
        workspace.write(OUTPUT, serde_json::to_string(&sorted)?).await?;
        Ok("Contacts sorted successfully.".to_string())
    }
}
