#![allow(clippy::disallowed_methods)]

mod common;

use std::collections::HashSet;
use std::error::Error;

use board::{
    BoardError, ExperienceLevel, JobId, JobType, ListingFilters, NewApplication, PostingUpdate,
    ValidationError,
};

use db::collections;

use common::{World, assert_newest_first, ids, job};

fn application() -> NewApplication {
    NewApplication {
        cover_letter: "I would love to join.".to_string(),
        resume_url: None,
        additional_info: None,
    }
}

#[tokio::test]
async fn unfiltered_page_holds_active_postings_newest_first() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeded = common::seed(
        &world,
        &company,
        vec![
            (job("Oldest", "Colombo", JobType::FullTime, "Technology"), true),
            (job("Closed", "Colombo", JobType::FullTime, "Technology"), false),
            (job("Middle", "Kandy", JobType::Contract, "Finance"), true),
            (job("Newest", "Galle", JobType::Internship, "Technology"), true),
        ],
    )
    .await;

    let page = company
        .listings()
        .list_page(&ListingFilters::all(), None)
        .await?;

    assert_eq!(ids(&page.items), vec![seeded[3].id, seeded[2].id, seeded[0].id]);
    assert!(page.items.iter().all(|p| p.is_active));
    assert!(!page.has_more);
    assert_eq!(company.listings().cached_jobs(), page.items);
    assert!(!company.listings().is_loading());
    Ok(())
}

#[tokio::test]
async fn cursor_pages_neither_repeat_nor_reorder() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let jobs = (0..25)
        .map(|i| (job(&format!("Job {i}"), "Colombo", JobType::FullTime, "Technology"), true))
        .collect();
    common::seed(&world, &company, jobs).await;
    let listings = company.listings();
    let filters = ListingFilters::all();

    let first = listings.list_page(&filters, None).await?;
    let second = listings.list_page(&filters, first.next_cursor.as_ref()).await?;
    let third = listings.list_page(&filters, second.next_cursor.as_ref()).await?;

    assert_eq!(
        [first.items.len(), second.items.len(), third.items.len()],
        [10, 10, 5]
    );
    assert_eq!([first.has_more, second.has_more, third.has_more], [true, true, false]);

    let first_ids: HashSet<JobId> = ids(&first.items).into_iter().collect();
    assert!(second.items.iter().all(|p| !first_ids.contains(&p.id)));

    let all: Vec<_> = [first.items.clone(), second.items.clone(), third.items.clone()].concat();
    assert_newest_first(&all);
    assert_eq!(ids(&all).into_iter().collect::<HashSet<_>>().len(), 25);

    // The browse view accumulated every page.
    assert_eq!(listings.cached_jobs(), all);
    assert!(!listings.has_more());

    // Same cursor, same page.
    let again = listings.list_page(&filters, first.next_cursor.as_ref()).await?;
    assert_eq!(again.items, second.items);
    Ok(())
}

#[tokio::test]
async fn exactly_one_full_page_reports_more_then_empty() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let jobs = (0..10)
        .map(|i| (job(&format!("Job {i}"), "Colombo", JobType::FullTime, "Technology"), true))
        .collect();
    common::seed(&world, &company, jobs).await;
    let listings = company.listings();

    let first = listings.list_page(&ListingFilters::all(), None).await?;
    assert!(first.has_more);

    let second = listings.load_more(&ListingFilters::all()).await?;
    assert!(second.items.is_empty());
    assert!(!second.has_more);
    assert!(second.next_cursor.is_none());

    let exhausted = listings.load_more(&ListingFilters::all()).await?;
    assert!(exhausted.items.is_empty());
    assert_eq!(listings.cached_jobs().len(), 10);
    Ok(())
}

#[tokio::test]
async fn every_filter_dimension_is_honoured() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeded = common::seed(
        &world,
        &company,
        vec![
            (job("Colombo contract fintech", "Colombo", JobType::Contract, "Finance"), true),
            (job("Colombo contract tech", "Colombo", JobType::Contract, "Technology"), true),
            (job("Colombo full-time fintech", "Colombo", JobType::FullTime, "Finance"), true),
            (job("Kandy contract fintech", "Kandy", JobType::Contract, "Finance"), true),
        ],
    )
    .await;
    let listings = company.listings();

    let filters = ListingFilters::all()
        .with_location("Colombo")
        .with_job_type(JobType::Contract)
        .with_industry("Finance");
    let page = listings.list_page(&filters, None).await?;
    assert_eq!(ids(&page.items), vec![seeded[0].id]);

    let by_type = ListingFilters::all().with_job_type(JobType::Contract);
    let page = listings.list_page(&by_type, None).await?;
    assert_eq!(ids(&page.items), vec![seeded[3].id, seeded[1].id, seeded[0].id]);

    let by_level = ListingFilters::all().with_experience_level(ExperienceLevel::Senior);
    assert!(listings.list_page(&by_level, None).await?.items.is_empty());

    let searched = listings.search("", &filters).await?;
    assert_eq!(ids(&searched), vec![seeded[0].id]);
    Ok(())
}

#[tokio::test]
async fn blank_search_matches_the_whole_listing() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let jobs = (0..13)
        .map(|i| (job(&format!("Job {i}"), "Colombo", JobType::FullTime, "Technology"), i % 4 != 0))
        .collect();
    common::seed(&world, &company, jobs).await;
    let listings = company.listings();

    let mut listed = Vec::new();
    let mut cursor = None;
    loop {
        let page = listings.list_page(&ListingFilters::all(), cursor.as_ref()).await?;
        listed.extend(page.items);
        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
    }

    let searched = listings.search("   ", &ListingFilters::all()).await?;
    assert_eq!(ids(&searched), ids(&listed));
    assert_eq!(searched.len(), 9);
    assert!(!listings.has_more());
    Ok(())
}

#[tokio::test]
async fn search_ignores_case_and_covers_every_text_field() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let mut react_skill = job("Frontend Developer", "Colombo", JobType::FullTime, "Technology");
    react_skill.skills = vec!["React".to_string(), "TypeScript".to_string()];
    let mut react_title = job("React Native Engineer", "Kandy", JobType::FullTime, "Technology");
    react_title.description = "Mobile apps".to_string();
    let seeded = common::seed(
        &world,
        &company,
        vec![
            (react_skill, true),
            (react_title, true),
            (job("Accountant", "Colombo", JobType::FullTime, "Finance"), true),
        ],
    )
    .await;
    let listings = company.listings();

    let upper = listings.search("REACT", &ListingFilters::all()).await?;
    let lower = listings.search("react", &ListingFilters::all()).await?;
    assert_eq!(upper, lower);
    assert_eq!(ids(&lower), vec![seeded[1].id, seeded[0].id]);

    let by_company = listings.search("acme", &ListingFilters::all()).await?;
    assert_eq!(by_company.len(), 3);

    let narrowed = listings
        .search("react", &ListingFilters::all().with_location("Kandy"))
        .await?;
    assert_eq!(ids(&narrowed), vec![seeded[1].id]);
    assert_eq!(listings.cached_jobs(), narrowed);
    Ok(())
}

#[tokio::test]
async fn missing_posting_is_none() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let board = world.client().await;
    assert_eq!(board.listings().get_by_id(JobId::new()).await?, None);
    Ok(())
}

#[tokio::test]
async fn writes_are_gated_by_role() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let signed_out = world.client().await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let company = common::company_client(&world, "Acme").await;
    let posting = job("Engineer", "Colombo", JobType::FullTime, "Technology");

    assert_eq!(
        signed_out.listings().post(posting.clone()).await,
        Err(BoardError::NotAuthenticated)
    );
    assert!(matches!(
        seeker.listings().post(posting.clone()).await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        seeker.listings().get_for_company().await,
        Err(BoardError::Authorization(_))
    ));

    let id = company.listings().post(posting).await?;
    assert!(matches!(
        company.listings().apply(id, application()).await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        company.listings().applications_for_current_user().await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        seeker.listings().applications_for_job(id).await,
        Err(BoardError::Authorization(_))
    ));
    assert_eq!(
        signed_out.listings().apply(id, application()).await,
        Err(BoardError::NotAuthenticated)
    );
    Ok(())
}

#[tokio::test]
async fn inverted_salary_is_rejected_without_writing() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let writes = world.store.write_count();

    let mut posting = job("Engineer", "Colombo", JobType::FullTime, "Technology");
    posting.salary_min = Some(150_000);
    posting.salary_max = Some(100_000);
    assert_eq!(
        company.listings().post(posting).await,
        Err(BoardError::Validation(ValidationError::SalaryRange {
            min: 150_000,
            max: 100_000
        }))
    );
    assert_eq!(world.store.write_count(), writes);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_may_update_or_withdraw() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let owner = common::company_client(&world, "Acme").await;
    let rival = common::company_client(&world, "Globex").await;
    let id = owner
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;

    let rename = PostingUpdate {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        rival.listings().update(id, rename.clone()).await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        rival.listings().withdraw(id).await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        rival.listings().applications_for_job(id).await,
        Err(BoardError::Authorization(_))
    ));
    assert!(matches!(
        owner.listings().update(JobId::new(), rename).await,
        Err(BoardError::NotFound(_))
    ));

    let posting = owner.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.title, "Engineer");
    Ok(())
}

#[tokio::test]
async fn update_patches_fields_and_keeps_the_counter() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let id = company
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;
    seeker.listings().apply(id, application()).await?;

    let before = company.listings().get_by_id(id).await?.ok_or("missing")?;
    company
        .listings()
        .update(
            id,
            PostingUpdate {
                title: Some("  Senior Engineer ".to_string()),
                salary_min: Some(200_000),
                ..Default::default()
            },
        )
        .await?;

    let after = company.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(after.title, "Senior Engineer");
    assert_eq!(after.salary_min, Some(200_000));
    assert_eq!(after.applications_count, 1);
    assert_eq!(after.posted_at, before.posted_at);
    assert!(after.updated_at >= before.updated_at);

    company.listings().update(id, PostingUpdate::deactivate()).await?;
    let page = company.listings().list_page(&ListingFilters::all(), None).await?;
    assert!(page.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn withdraw_removes_the_posting_everywhere() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let listings = company.listings();
    let keep = listings
        .post(job("Keep", "Colombo", JobType::FullTime, "Technology"))
        .await?;
    let drop = listings
        .post(job("Drop", "Colombo", JobType::FullTime, "Technology"))
        .await?;
    listings.list_page(&ListingFilters::all(), None).await?;
    assert_eq!(listings.cached_jobs().len(), 2);

    listings.withdraw(drop).await?;
    assert_eq!(listings.get_by_id(drop).await?, None);
    assert_eq!(ids(&listings.cached_jobs()), vec![keep]);
    assert_eq!(ids(&listings.get_for_company().await?), vec![keep]);
    Ok(())
}

#[tokio::test]
async fn one_application_per_seeker_and_posting() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let id = company
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;

    let application_id = seeker.listings().apply(id, application()).await?;
    assert_eq!(
        seeker.listings().apply(id, application()).await,
        Err(BoardError::AlreadyApplied(id))
    );

    let posting = seeker.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.applications_count, 1);

    let received = company.listings().applications_for_job(id).await?;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].id, application_id);
    assert_eq!(received[0].applicant_name, "Kamal Perera");
    assert_eq!(received[0].applicant_email, "kamal@example.com");
    // Falls back to the resume on the profile.
    assert_eq!(received[0].resume_url, "https://cv.example.com/kamal.pdf");
    Ok(())
}

#[tokio::test]
async fn applications_need_an_open_posting_and_valid_fields() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let id = company
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;

    assert!(matches!(
        seeker.listings().apply(JobId::new(), application()).await,
        Err(BoardError::NotFound(_))
    ));

    let blank = NewApplication {
        cover_letter: "  ".to_string(),
        ..application()
    };
    assert_eq!(
        seeker.listings().apply(id, blank).await,
        Err(BoardError::Validation(ValidationError::Missing { field: "cover_letter" }))
    );

    let relative = NewApplication {
        resume_url: Some("me.pdf".to_string()),
        ..application()
    };
    assert!(matches!(
        seeker.listings().apply(id, relative).await,
        Err(BoardError::Validation(ValidationError::InvalidUrl { field: "resume_url", .. }))
    ));

    company.listings().update(id, PostingUpdate::deactivate()).await?;
    assert!(matches!(
        seeker.listings().apply(id, application()).await,
        Err(BoardError::Validation(ValidationError::Invalid(_)))
    ));

    let posting = company.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.applications_count, 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_applications_are_all_counted() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let first = common::seeker_client(&world, "Kamal").await;
    let second = common::seeker_client(&world, "Sunil").await;
    let id = company
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;

    let (a, b) = tokio::join!(
        first.listings().apply(id, application()),
        second.listings().apply(id, application())
    );
    a?;
    b?;

    let posting = company.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.applications_count, 2);
    assert_eq!(company.listings().applications_for_job(id).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_writes_leave_the_listing_untouched() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let listings = company.listings();
    let id = listings
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;
    listings.list_page(&ListingFilters::all(), None).await?;
    let cached = listings.cached_jobs();

    world.store.set_offline(true);
    let update = listings
        .update(
            id,
            PostingUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(BoardError::RemoteUnavailable(_))));
    assert!(update.is_err_and(|e| e.is_retryable()));

    let refresh = listings.list_page(&ListingFilters::all(), None).await;
    assert!(matches!(refresh, Err(BoardError::RemoteUnavailable(_))));
    assert!(listings.withdraw(id).await.is_err());

    assert_eq!(listings.cached_jobs(), cached);
    assert!(!listings.is_loading());

    world.store.set_offline(false);
    let posting = listings.get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.title, "Engineer");
    Ok(())
}

#[tokio::test]
async fn dashboards_summarise_postings_and_applications() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let listings = company.listings();

    let open = listings
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;
    let closing = listings
        .post(job("Analyst", "Colombo", JobType::FullTime, "Finance"))
        .await?;
    let withdrawn = listings
        .post(job("Designer", "Colombo", JobType::Contract, "Technology"))
        .await?;
    for id in [open, closing, withdrawn] {
        seeker.listings().apply(id, application()).await?;
    }
    listings.update(closing, PostingUpdate::deactivate()).await?;
    listings.withdraw(withdrawn).await?;

    let summary = listings.company_dashboard().await?;
    assert_eq!(summary.total_jobs, 2);
    assert_eq!(summary.active_jobs, 1);
    assert_eq!(summary.total_applications, 2);

    let mine = seeker.listings().seeker_dashboard().await?;
    assert_eq!(mine.submitted, 3);
    assert_eq!(mine.pending, 3);
    assert_eq!(mine.recent.len(), 3);
    let gone = mine
        .recent
        .iter()
        .find(|recent| recent.application.job_id == withdrawn)
        .ok_or("withdrawn application missing")?;
    assert!(gone.posting.is_none());

    assert!(matches!(
        seeker.listings().company_dashboard().await,
        Err(BoardError::Authorization(_))
    ));
    Ok(())
}

#[tokio::test]
async fn failed_count_update_does_not_leave_the_application_behind() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeker = common::seeker_client(&world, "Kamal").await;
    let id = company
        .listings()
        .post(job("Engineer", "Colombo", JobType::FullTime, "Technology"))
        .await?;

    world.store.fail_writes_to(collections::JOBS);
    let first = seeker.listings().apply(id, application()).await;
    assert!(first.is_err_and(|e| e.is_retryable()));
    assert!(world.store.is_empty(collections::APPLICATIONS));

    world.store.restore_writes();
    seeker.listings().apply(id, application()).await?;

    let posting = company.listings().get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(posting.applications_count, 1);
    assert_eq!(company.listings().applications_for_job(id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn blank_notes_are_cleared_in_the_store_and_the_listing() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let listings = company.listings();
    let mut fields = job("Engineer", "Colombo", JobType::FullTime, "Technology");
    fields.requirements = Some("Rust".to_string());
    fields.benefits = Some("Medical".to_string());
    let id = listings.post(fields).await?;
    listings.list_page(&ListingFilters::all(), None).await?;

    listings
        .update(
            id,
            PostingUpdate {
                requirements: Some("   ".to_string()),
                benefits: Some("  Medical, remote days ".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let stored = listings.get_by_id(id).await?.ok_or("missing")?;
    assert_eq!(stored.requirements, None);
    assert_eq!(stored.benefits.as_deref(), Some("Medical, remote days"));
    assert_eq!(listings.cached_jobs(), vec![stored]);
    Ok(())
}

#[tokio::test]
async fn search_term_keeps_its_surrounding_spaces() -> Result<(), Box<dyn Error>> {
    let world = World::new();
    let company = common::company_client(&world, "Acme").await;
    let seeded = common::seed(
        &world,
        &company,
        vec![
            (job("Rust Developer", "Colombo", JobType::FullTime, "Technology"), true),
            (job("Senior Rust Developer", "Colombo", JobType::FullTime, "Technology"), true),
        ],
    )
    .await;
    let listings = company.listings();

    let spaced = listings.search(" rust", &ListingFilters::all()).await?;
    assert_eq!(ids(&spaced), vec![seeded[1].id]);

    let bare = listings.search("rust", &ListingFilters::all()).await?;
    assert_eq!(ids(&bare), vec![seeded[1].id, seeded[0].id]);
    Ok(())
}
