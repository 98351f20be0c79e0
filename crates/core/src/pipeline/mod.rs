pub mod capture_session_use_case;
pub mod create_project_use_case;
pub mod project_analytics;

#[cfg(test)]
pub(crate) mod test_support;
