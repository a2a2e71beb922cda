use crate::model::draft::Draft;

/// Lists the required fields of `step` that are still empty. Step 4 has none.
pub fn missing_fields(draft: &Draft, step: u8) -> Vec<&'static str> {
    let mut missing = Vec::new();

    match step {
        1 => {
            let required = [
                ("branch", &draft.branch),
                ("course", &draft.course),
                ("rollNumber", &draft.roll_number),
                ("section", &draft.section),
            ];
            missing.extend(required.iter().filter(|(_, v)| v.is_empty()).map(|(k, _)| *k));
        }
        2 => {
            if draft.name.is_empty() {
                missing.push("name");
            }
            if draft.batch_info.is_empty() {
                missing.push("batchInfo");
            }
            if draft.ppt_file.is_none() {
                missing.push("pptFile");
            }
            if draft.ieee_file.is_none() {
                missing.push("ieeeFile");
            }
        }
        3 => {
            if !draft.batch_members.iter().all(|m| m.is_complete()) {
                missing.push("batchMembers");
            }
        }
        _ => {}
    }

    missing
}
