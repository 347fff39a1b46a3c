use anyhow::Result;
use autoscale_cuckoo_filter::CuckooFilter;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::store::Directory;

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// False means the email is certainly unregistered; true only means "maybe".
pub fn might_exist(email: &str) -> bool {
    EMAIL_FILTER.read().contains(&normalize(email))
}

pub fn insert(email: &str) {
    EMAIL_FILTER.write().add(&normalize(email));
}

/// Load every registered email, `batch_size` at a time per lock acquisition.
pub fn warmup_email_filter(directory: &dyn Directory, batch_size: usize) -> Result<()> {
    let users = directory.users()?;
    let batch_size = batch_size.max(1);

    for batch in users.chunks(batch_size) {
        let mut filter = EMAIL_FILTER.write();
        for user in batch {
            filter.add(&normalize(&user.email));
        }
    }

    log::info!("Email filter warmup complete: {} users", users.len());
    Ok(())
}
