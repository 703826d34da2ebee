use labslot_core::errors::LabResult;
use labslot_core::models::slot::{CreateSlotRequest, UpdateSlotRequest};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbBooking, DbSlot};

// Mock repositories for testing
mock! {
    pub SlotRepo {
        pub async fn create_slot(
            &self,
            teacher_id: &'static str,
            teacher_name: &'static str,
            req: CreateSlotRequest,
        ) -> eyre::Result<DbSlot>;

        pub async fn get_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn list_available_by_level(
            &self,
            level: i32,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn list_by_teacher(
            &self,
            teacher_id: &'static str,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn update_slot(
            &self,
            id: Uuid,
            changes: UpdateSlotRequest,
        ) -> LabResult<DbSlot>;

        pub async fn set_active(
            &self,
            id: Uuid,
            is_active: bool,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn delete_slot(
            &self,
            id: Uuid,
        ) -> LabResult<()>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn create_booking(
            &self,
            slot_id: Uuid,
            student_id: &'static str,
            notes: Option<&'static str>,
        ) -> LabResult<DbBooking>;

        pub async fn cancel_booking(
            &self,
            booking_id: Uuid,
            student_id: &'static str,
        ) -> LabResult<DbBooking>;

        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn list_by_student(
            &self,
            student_id: &'static str,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn list_confirmed_by_slot(
            &self,
            slot_id: Uuid,
        ) -> eyre::Result<Vec<DbBooking>>;
    }
}
