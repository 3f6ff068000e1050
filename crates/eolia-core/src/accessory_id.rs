//! Deterministic accessory UUIDs

use uuid::Uuid;

/// Namespace for accessory UUIDs derived from appliance ids
pub const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6a3e_52c1_9d0f_4b7e_8a21_3f5c_e0d4_71b9);

/// Derive the accessory UUID for an appliance id
///
/// Name-based (v5): the same id always yields the same UUID, across runs.
pub fn accessory_uuid(appliance_id: &str) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, appliance_id.as_bytes())
}
