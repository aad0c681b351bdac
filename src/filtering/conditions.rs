use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Query, SelectStatement},
};

use super::criteria::{DateWindow, RentalCriteria, VehicleCriteria};
use super::search::{contains_any, contains_ignore_case};
use crate::entities::{rental, rental::RentalStatus, user, vehicle, vehicle_feature};

/// `min <= column <= max`, each bound optional.
fn between<C, V>(condition: Condition, column: C, min: Option<V>, max: Option<V>) -> Condition
where
    C: ColumnTrait,
    V: Into<sea_orm::Value>,
{
    condition
        .add_option(min.map(|min| column.gte(min)))
        .add_option(max.map(|max| column.lte(max)))
}

/// Ids of vehicles with a confirmed rental overlapping `window`. The end date
/// is exclusive, so back-to-back rentals never collide.
#[must_use]
pub fn confirmed_rentals_overlapping(window: DateWindow) -> SelectStatement {
    Query::select()
        .column(rental::Column::VehicleId)
        .from(rental::Entity)
        .and_where(rental::Column::Status.eq(RentalStatus::Confirmed))
        .and_where(rental::Column::StartDate.lt(window.end))
        .and_where(rental::Column::EndDate.gt(window.start))
        .to_owned()
}

fn vehicles_with_feature(feature_id: i32) -> SelectStatement {
    Query::select()
        .column(vehicle_feature::Column::VehicleId)
        .from(vehicle_feature::Entity)
        .and_where(vehicle_feature::Column::FeatureId.eq(feature_id))
        .to_owned()
}

pub(crate) fn vehicle_condition(criteria: &VehicleCriteria) -> Condition {
    let mut condition = Condition::all()
        .add_option(criteria.category_id.map(|id| vehicle::Column::CategoryId.eq(id)))
        .add_option(criteria.location_id.map(|id| vehicle::Column::LocationId.eq(id)))
        .add_option(criteria.transmission.map(|t| vehicle::Column::Transmission.eq(t)))
        .add_option(criteria.fuel_type.map(|f| vehicle::Column::FuelType.eq(f)))
        .add_option(criteria.active.map(|active| vehicle::Column::Active.eq(active)));

    condition = between(
        condition,
        vehicle::Column::DailyRentalFee,
        criteria.min_daily_rental_fee,
        criteria.max_daily_rental_fee,
    );
    condition = between(condition, vehicle::Column::Year, criteria.min_year, criteria.max_year);
    condition = between(condition, vehicle::Column::Seats, criteria.min_seats, criteria.max_seats);

    // One membership test per feature: the vehicle must carry all of them.
    for feature_id in &criteria.feature_ids {
        condition = condition.add(vehicle::Column::Id.in_subquery(vehicles_with_feature(*feature_id)));
    }

    if let Some(term) = &criteria.search {
        condition = condition.add(contains_any(
            &[
                vehicle::Column::PlateNumber,
                vehicle::Column::Brand,
                vehicle::Column::Model,
            ],
            term,
        ));
    }

    if let Some(window) = criteria.available {
        condition =
            condition.add(vehicle::Column::Id.not_in_subquery(confirmed_rentals_overlapping(window)));
    }

    condition
}

pub(crate) fn rental_condition(criteria: &RentalCriteria) -> Condition {
    let mut condition = Condition::all()
        .add_option(criteria.user_id.map(|id| rental::Column::UserId.eq(id)))
        .add_option(criteria.vehicle_id.map(|id| rental::Column::VehicleId.eq(id)))
        .add_option(
            criteria
                .pickup_location_id
                .map(|id| rental::Column::PickupLocationId.eq(id)),
        )
        .add_option(criteria.status.map(|status| rental::Column::Status.eq(status)));

    condition = between(
        condition,
        rental::Column::TotalPrice,
        criteria.min_total_price,
        criteria.max_total_price,
    );

    if let Some(term) = &criteria.search {
        let vehicles = Query::select()
            .column(vehicle::Column::Id)
            .from(vehicle::Entity)
            .and_where(contains_ignore_case(vehicle::Column::PlateNumber, term))
            .to_owned();
        let users = Query::select()
            .column(user::Column::Id)
            .from(user::Entity)
            .cond_where(contains_any(&[user::Column::FullName, user::Column::Email], term))
            .to_owned();
        condition = condition.add(
            Condition::any()
                .add(rental::Column::VehicleId.in_subquery(vehicles))
                .add(rental::Column::UserId.in_subquery(users)),
        );
    }

    if let Some(window) = criteria.overlapping {
        condition = condition
            .add(rental::Column::StartDate.lt(window.end))
            .add(rental::Column::EndDate.gt(window.start));
    }

    condition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::criteria::Criteria;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn vehicle_sql(criteria: &VehicleCriteria) -> String {
        vehicle::Entity::find()
            .filter(criteria.condition())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_empty_criteria_has_no_where_clause() {
        let sql = vehicle_sql(&VehicleCriteria::default());
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn test_range_and_equality_constraints() {
        let sql = vehicle_sql(&VehicleCriteria {
            location_id: Some(2),
            min_daily_rental_fee: Some(100.0),
            max_daily_rental_fee: Some(300.0),
            ..Default::default()
        });

        assert!(sql.contains(r#""vehicles"."location_id" = 2"#), "{sql}");
        assert!(sql.contains(r#""vehicles"."daily_rental_fee" >= 100"#), "{sql}");
        assert!(sql.contains(r#""vehicles"."daily_rental_fee" <= 300"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_each_feature_is_a_separate_membership_test() {
        let sql = vehicle_sql(&VehicleCriteria {
            feature_ids: vec![1, 3],
            ..Default::default()
        });
        assert_eq!(sql.matches("FROM \"vehicle_features\"").count(), 2, "{sql}");
    }

    #[test]
    fn test_availability_excludes_confirmed_overlaps() {
        let date = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let sql = vehicle_sql(&VehicleCriteria {
            available: Some(DateWindow::new(date("2025-06-01"), date("2025-06-05")).unwrap()),
            ..Default::default()
        });

        assert!(sql.contains("NOT IN (SELECT"), "{sql}");
        assert!(sql.contains("'Confirmed'"), "{sql}");
        assert!(sql.contains(r#""rentals"."start_date" < '2025-06-05'"#), "{sql}");
        assert!(sql.contains(r#""rentals"."end_date" > '2025-06-01'"#), "{sql}");
    }

    #[test]
    fn test_rental_search_spans_vehicle_and_user() {
        let sql = rental::Entity::find()
            .filter(
                RentalCriteria {
                    search: Some("ada".to_string()),
                    ..Default::default()
                }
                .condition(),
            )
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#"UPPER("vehicles"."plate_number")"#), "{sql}");
        assert!(sql.contains(r#"UPPER("users"."full_name")"#), "{sql}");
        assert!(sql.contains(r#"UPPER("users"."email")"#), "{sql}");
    }
}
