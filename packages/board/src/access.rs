//! Role checks against the current session.

use board_core::{CompanyProfile, JobPosting, JobSeekerProfile, Principal, Profile};
use session::Session;

use crate::BoardError;

/// Signed-in company and its profile, or why the caller is not one.
pub(crate) fn company(session: &Session, action: &str) -> Result<(Principal, CompanyProfile), BoardError> {
    let snapshot = session.snapshot();
    let principal = snapshot.principal.ok_or(BoardError::NotAuthenticated)?;
    match snapshot.profile {
        Some(Profile::Company(company)) => Ok((principal, company)),
        _ => Err(BoardError::authorization(format!("only companies can {action}"))),
    }
}

/// Signed-in job seeker and their profile, or why the caller is not one.
pub(crate) fn job_seeker(
    session: &Session,
    action: &str,
) -> Result<(Principal, JobSeekerProfile), BoardError> {
    let snapshot = session.snapshot();
    let principal = snapshot.principal.ok_or(BoardError::NotAuthenticated)?;
    match snapshot.profile {
        Some(Profile::JobSeeker(seeker)) => Ok((principal, seeker)),
        _ => Err(BoardError::authorization(format!("only job seekers can {action}"))),
    }
}

pub(crate) fn owns(principal: &Principal, posting: &JobPosting) -> Result<(), BoardError> {
    if posting.company_id != principal.id {
        return Err(BoardError::authorization(format!(
            "job {} belongs to another company",
            posting.id
        )));
    }
    Ok(())
}
