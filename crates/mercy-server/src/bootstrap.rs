use mercy_core::{BootstrapConfig, Permission, Staff, Student};
use mercy_runtime::{hash_password, records};
use mercy_store::{Collection, DocumentStore, Filter};

/// Overrides `[bootstrap].admin_password`.
pub const ADMIN_PASSWORD_ENV: &str = "MERCY_BOOTSTRAP_ADMIN_PASSWORD";

/// On startup, if no staff exist, create an administrator holding every
/// permission.
///
/// Password source (highest precedence first):
/// - env `MERCY_BOOTSTRAP_ADMIN_PASSWORD`
/// - `config.toml` `[bootstrap].admin_password`
pub async fn bootstrap_admin(store: &dyn DocumentStore, cfg: &BootstrapConfig) -> anyhow::Result<()> {
    if !cfg.enabled || store.count(Collection::Staffs).await? > 0 {
        return Ok(());
    }

    let password = std::env::var(ADMIN_PASSWORD_ENV).unwrap_or_else(|_| cfg.admin_password.clone());
    if password.trim().is_empty() {
        anyhow::bail!(
            "bootstrap admin password is empty (set {ADMIN_PASSWORD_ENV} or config.toml [bootstrap].admin_password)"
        );
    }

    let filter = Filter::eq("studentId", cfg.admin_student_id.as_str());
    let student = match records::find::<Student>(store, &filter).await? {
        Some(existing) => existing,
        None => {
            let mut student = Student::new(cfg.admin_student_id.clone());
            student.name = "Administrator".to_string();
            records::insert(store, &student).await?;
            student
        }
    };

    let mut staff = Staff::new(&student, hash_password(&password)?);
    staff.permissions = Permission::ALL.to_vec();
    records::insert(store, &staff).await?;

    tracing::warn!(
        student_id = %cfg.admin_student_id,
        "Bootstrapped administrator (password taken from env/config)"
    );
    Ok(())
}
