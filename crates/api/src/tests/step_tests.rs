// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use stepcount_domain::ScalarInput;
use stepcount_persistence::Persistence;

use crate::tests::helpers::{create_test_persistence, name_request, seed_catalog, steps_request, today};
use crate::{
    ApiError, AverageInfo, RecordStepsRequest, StepEntryInfo, UpdateStepEntryRequest,
    create_employee, delete_location, delete_step_entry, list_averages, list_step_entries,
    record_steps, update_step_entry,
};

fn only_entry(persistence: &mut Persistence) -> StepEntryInfo {
    let mut entries: Vec<StepEntryInfo> = list_step_entries(persistence).unwrap();
    assert_eq!(entries.len(), 1);
    entries.remove(0)
}

#[test]
fn test_record_steps_is_idempotent_per_employee_and_day() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    for steps in [1000, 2500, 800] {
        let response = record_steps(
            &mut persistence,
            &steps_request(employee_id, location_id, "2026-03-14", steps),
            today(),
        )
        .unwrap();
        assert!(response.success);
    }

    let entry: StepEntryInfo = only_entry(&mut persistence);
    assert_eq!(entry.steps, 800);
    assert_eq!(entry.date, "2026-03-14");
}

#[test]
fn test_record_steps_accepts_numeric_strings() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    let request: RecordStepsRequest = RecordStepsRequest {
        employee_id: Some(ScalarInput::Text(employee_id.to_string())),
        location_id: Some(ScalarInput::Text(location_id.to_string())),
        date: Some(ScalarInput::from("2026-03-15")),
        steps: Some(ScalarInput::from("4200")),
    };
    record_steps(&mut persistence, &request, today()).unwrap();

    assert_eq!(only_entry(&mut persistence).steps, 4200);
}

#[test]
fn test_record_steps_allows_zero_steps() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    record_steps(
        &mut persistence,
        &steps_request(employee_id, location_id, "2026-03-15", 0),
        today(),
    )
    .unwrap();

    assert_eq!(only_entry(&mut persistence).steps, 0);
}

#[test]
fn test_record_steps_requires_all_fields() {
    let mut persistence: Persistence = create_test_persistence();

    let mut request: RecordStepsRequest = steps_request(1, 1, "2026-03-01", 10);
    request.steps = None;
    let err: ApiError = record_steps(&mut persistence, &request, today()).unwrap_err();
    assert_eq!(
        err.message(),
        "employeeId, locationId, date and steps are required"
    );

    let mut request: RecordStepsRequest = steps_request(1, 1, "2026-03-01", 10);
    request.date = Some(ScalarInput::from(""));
    let err: ApiError = record_steps(&mut persistence, &request, today()).unwrap_err();
    assert_eq!(
        err.message(),
        "employeeId, locationId, date and steps are required"
    );
}

#[test]
fn test_record_steps_rejects_negative_and_fractional_steps() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    for steps in [ScalarInput::Integer(-5), ScalarInput::Float(10.5), ScalarInput::from("many")] {
        let mut request: RecordStepsRequest =
            steps_request(employee_id, location_id, "2026-03-01", 0);
        request.steps = Some(steps);

        let err: ApiError = record_steps(&mut persistence, &request, today()).unwrap_err();
        assert_eq!(err.message(), "Steps must be a non-negative integer");
    }
}

#[test]
fn test_record_steps_rejects_invalid_date() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    let err: ApiError = record_steps(
        &mut persistence,
        &steps_request(employee_id, location_id, "2026-02-30", 10),
        today(),
    )
    .unwrap_err();
    assert_eq!(err.message(), "Invalid date");
}

#[test]
fn test_record_steps_rejects_future_date() {
    let mut persistence: Persistence = create_test_persistence();
    let (employee_id, location_id) = seed_catalog(&mut persistence);

    let err: ApiError = record_steps(
        &mut persistence,
        &steps_request(employee_id, location_id, "2099-01-01", 500),
        today(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("date"),
            message: String::from("Date cannot be in the future"),
        }
    );

    // Tomorrow is already in the future; today is not.
    assert!(
        record_steps(
            &mut persistence,
            &steps_request(employee_id, location_id, "2026-03-16", 1),
            today(),
        )
        .is_err()
    );
    assert!(
        record_steps(
            &mut persistence,
            &steps_request(employee_id, location_id, "2026-03-15", 1),
            today(),
        )
        .is_ok()
    );
}

#[test]
fn test_record_steps_for_unknown_employee() {
    let mut persistence: Persistence = create_test_persistence();
    let (_, location_id) = seed_catalog(&mut persistence);

    let err: ApiError = record_steps(
        &mut persistence,
        &steps_request(9999, location_id, "2026-03-01", 10),
        today(),
    )
    .unwrap_err();
    assert_eq!(err.message(), "Employee or location does not exist");
}

#[test]
fn test_averages_are_rounded_strings() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    let ola: i64 = create_employee(&mut persistence, &name_request("Ola"))
        .unwrap()
        .id;

    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1000), today()).unwrap();
    record_steps(&mut persistence, &steps_request(ola, oslo, "2026-03-01", 2000), today()).unwrap();

    assert_eq!(
        list_averages(&mut persistence).unwrap(),
        vec![AverageInfo {
            date: String::from("2026-03-01"),
            location: String::from("Oslo"),
            average: String::from("1500.00"),
        }]
    );
}

#[test]
fn test_averages_skip_entries_of_deleted_locations() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1000), today()).unwrap();

    delete_location(&mut persistence, oslo).unwrap();

    assert!(list_averages(&mut persistence).unwrap().is_empty());
    let entry: StepEntryInfo = only_entry(&mut persistence);
    assert_eq!(entry.location_id, None);
    assert_eq!(entry.location_name, None);
}

#[test]
fn test_update_step_entry_partially() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1000), today()).unwrap();
    let id: i64 = only_entry(&mut persistence).id;

    let request: UpdateStepEntryRequest = UpdateStepEntryRequest {
        steps: Some(ScalarInput::from(1234)),
        ..UpdateStepEntryRequest::default()
    };
    update_step_entry(&mut persistence, id, &request, today()).unwrap();

    let entry: StepEntryInfo = only_entry(&mut persistence);
    assert_eq!(entry.steps, 1234);
    assert_eq!(entry.date, "2026-03-01");
    assert_eq!(entry.location_name.as_deref(), Some("Oslo"));
}

#[test]
fn test_update_step_entry_rejects_future_date() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1000), today()).unwrap();
    let id: i64 = only_entry(&mut persistence).id;

    let request: UpdateStepEntryRequest = UpdateStepEntryRequest {
        date: Some(ScalarInput::from("2099-01-01")),
        ..UpdateStepEntryRequest::default()
    };
    let err: ApiError = update_step_entry(&mut persistence, id, &request, today()).unwrap_err();
    assert_eq!(err.message(), "Date cannot be in the future");
}

#[test]
fn test_update_step_entry_without_fields() {
    let mut persistence: Persistence = create_test_persistence();

    let err: ApiError = update_step_entry(
        &mut persistence,
        1,
        &UpdateStepEntryRequest::default(),
        today(),
    )
    .unwrap_err();
    assert_eq!(err.message(), "No fields to update");
}

#[test]
fn test_update_missing_step_entry_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let request: UpdateStepEntryRequest = UpdateStepEntryRequest {
        steps: Some(ScalarInput::from(1)),
        ..UpdateStepEntryRequest::default()
    };
    let err: ApiError = update_step_entry(&mut persistence, 555, &request, today()).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_update_step_entry_onto_existing_day_is_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1), today()).unwrap();
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-02", 2), today()).unwrap();
    let newest: i64 = list_step_entries(&mut persistence).unwrap()[0].id;

    let request: UpdateStepEntryRequest = UpdateStepEntryRequest {
        date: Some(ScalarInput::from("2026-03-01")),
        ..UpdateStepEntryRequest::default()
    };
    let err: ApiError = update_step_entry(&mut persistence, newest, &request, today()).unwrap_err();

    assert!(matches!(err, ApiError::DomainRuleViolation { .. }));
    assert_eq!(
        err.message(),
        "An entry already exists for this employee and date"
    );
}

#[test]
fn test_update_request_accepts_snake_case_fields() {
    let request: UpdateStepEntryRequest =
        serde_json::from_str(r#"{"employee_id": 3, "location_id": "4"}"#).unwrap();

    assert_eq!(request.employee_id, Some(ScalarInput::Integer(3)));
    assert_eq!(request.location_id, Some(ScalarInput::from("4")));
}

#[test]
fn test_delete_step_entry() {
    let mut persistence: Persistence = create_test_persistence();
    let (kari, oslo) = seed_catalog(&mut persistence);
    record_steps(&mut persistence, &steps_request(kari, oslo, "2026-03-01", 1), today()).unwrap();
    let id: i64 = only_entry(&mut persistence).id;

    assert!(delete_step_entry(&mut persistence, id).unwrap().success);
    assert!(list_step_entries(&mut persistence).unwrap().is_empty());
}
