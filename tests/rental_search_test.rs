mod common;

use common::{VehicleSeed, insert_rental, insert_user, seed_reference_data, setup_test_db};
use fleetdesk::core::SearchResource;
use fleetdesk::entities::rental::RentalStatus;
use fleetdesk::filtering::{Page, PageRequest, RentalCriteria, SortSpec, parse_criteria};
use fleetdesk::resources::Rental;
use sea_orm::DatabaseConnection;

struct Fixture {
    ana: i32,
    bruno: i32,
    golf: i32,
    rentals: Vec<i32>,
}

/// Four rentals across two customers and two vehicles.
async fn seed(db: &DatabaseConnection) -> Fixture {
    let reference = seed_reference_data(db).await.unwrap();
    let ana = insert_user(db, "Ana Costa", "ana@example.com").await.unwrap();
    let bruno = insert_user(db, "Bruno Silva", "bruno@fleet.test").await.unwrap();
    let golf = VehicleSeed::new("GOLF-01", 50.0, reference.airport)
        .insert(db)
        .await
        .unwrap();
    let panda = VehicleSeed::new("PANDA-02", 30.0, reference.downtown)
        .insert(db)
        .await
        .unwrap();

    let mut rentals = Vec::new();
    for (user, vehicle, start, end, status) in [
        (ana.id, &golf, "2030-01-01", "2030-01-04", RentalStatus::Confirmed),
        (ana.id, &panda, "2030-02-01", "2030-02-11", RentalStatus::Pending),
        (bruno.id, &golf, "2030-01-04", "2030-01-06", RentalStatus::Completed),
        (bruno.id, &panda, "2030-03-01", "2030-03-02", RentalStatus::Cancelled),
    ] {
        let rental = insert_rental(db, user, vehicle, start, end, status).await.unwrap();
        rentals.push(rental.id);
    }

    Fixture {
        ana: ana.id,
        bruno: bruno.id,
        golf: golf.id,
        rentals,
    }
}

async fn search(db: &DatabaseConnection, filter: &str, sort: Option<SortSpec>) -> Page<Rental> {
    let criteria: RentalCriteria = parse_criteria(Some(filter)).unwrap();
    let request = PageRequest::new(1, 50, 100).unwrap();
    Rental::search(db, &criteria, sort.as_ref(), request).await.unwrap()
}

fn ids(page: &Page<Rental>) -> Vec<i32> {
    page.items.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_filter_by_customer_and_status() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let page = search(&db, &format!(r#"{{"userId": {}}}"#, fixture.ana), None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[0], fixture.rentals[1]]);

    let page = search(
        &db,
        &format!(r#"{{"userId": {}, "status": "completed"}}"#, fixture.bruno),
        None,
    )
    .await;
    assert_eq!(ids(&page), vec![fixture.rentals[2]]);

    let page = search(&db, &format!(r#"{{"vehicleId": {}}}"#, fixture.golf), None).await;
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_total_price_range() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    // Prices: 150, 300, 100, 30.
    let page = search(&db, r#"{"minTotalPrice": 100, "maxTotalPrice": 150}"#, None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[0], fixture.rentals[2]]);
}

#[tokio::test]
async fn test_search_matches_plate_name_or_email() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let page = search(&db, r#"{"search": "panda"}"#, None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[1], fixture.rentals[3]]);

    let page = search(&db, r#"{"search": "SILVA"}"#, None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[2], fixture.rentals[3]]);

    let page = search(&db, r#"{"search": "fleet.test"}"#, None).await;
    assert_eq!(page.total_count, 2);

    let page = search(&db, r#"{"search": "nobody"}"#, None).await;
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_overlap_window_excludes_touching_rentals() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let page = search(&db, r#"{"overlapsFrom": "2030-01-04", "overlapsTo": "2030-01-05"}"#, None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[2]]);

    let page = search(&db, r#"{"overlapsFrom": "2030-01-03", "overlapsTo": "2030-01-05"}"#, None).await;
    assert_eq!(ids(&page), vec![fixture.rentals[0], fixture.rentals[2]]);
}

#[tokio::test]
async fn test_sort_by_start_date_descending() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let page = search(&db, "{}", Some(SortSpec::descending("startDate"))).await;
    assert_eq!(
        ids(&page),
        vec![
            fixture.rentals[3],
            fixture.rentals[1],
            fixture.rentals[2],
            fixture.rentals[0]
        ]
    );

    let page = search(&db, "{}", Some(SortSpec::ascending("totalPrice"))).await;
    assert_eq!(
        ids(&page),
        vec![
            fixture.rentals[3],
            fixture.rentals[2],
            fixture.rentals[0],
            fixture.rentals[1]
        ]
    );
}

#[test]
fn test_unknown_rental_filter_field_is_rejected() {
    let err = parse_criteria::<RentalCriteria>(Some(r#"{"plateNumber": "X"}"#)).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.errors()[0].field, "plateNumber");
}
