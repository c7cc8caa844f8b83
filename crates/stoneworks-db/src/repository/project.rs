//! # Project Repository
//!
//! Database operations for projects and their surfaces and cutouts.
//!
//! ## Aggregate Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  projects ──1:N──► surfaces (position) ──1:N──► cutouts (position)      │
//! │                        │                                                │
//! │                        └── material_id ──► materials                    │
//! │                                                                         │
//! │  save():   one transaction                                              │
//! │            upsert project row                                           │
//! │            delete old surfaces + cutouts                                │
//! │            insert surfaces and cutouts in array order                   │
//! │                                                                         │
//! │  get_by_id(): project + surfaces (hydrated with materials) + cutouts    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Surface order is the quote's line order, so it is persisted explicitly
//! rather than left to rowid order.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::material::{MaterialRecord, MATERIAL_COLUMNS};
use crate::repository::parse_decimal;
use stoneworks_core::validation::validate_name;
use stoneworks_core::{
    Complexity, CoreError, Cutout, CutoutType, DeliveryZone, EdgeProfile, Project, ProjectStatus,
    ProjectType, StoneMaterial, Surface, SurfaceType,
};

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProjectRecord {
    id: String,
    customer_id: String,
    name: String,
    project_type: ProjectType,
    status: ProjectStatus,
    address: Option<String>,
    notes: Option<String>,
    delivery_zone: Option<DeliveryZone>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SurfaceRecord {
    id: String,
    name: String,
    surface_type: SurfaceType,
    width_mm: String,
    height_mm: String,
    enabled: bool,
    material_id: Option<String>,
    edge_profile: EdgeProfile,
    complexity: Complexity,
}

#[derive(Debug, sqlx::FromRow)]
struct CutoutRecord {
    id: String,
    surface_id: String,
    cutout_type: CutoutType,
    width_mm: String,
    height_mm: String,
    x_mm: String,
    y_mm: String,
    notes: Option<String>,
}

impl TryFrom<CutoutRecord> for Cutout {
    type Error = DbError;

    fn try_from(row: CutoutRecord) -> DbResult<Self> {
        Ok(Cutout {
            width_mm: parse_decimal("cutouts", "width_mm", &row.width_mm)?,
            height_mm: parse_decimal("cutouts", "height_mm", &row.height_mm)?,
            x_mm: parse_decimal("cutouts", "x_mm", &row.x_mm)?,
            y_mm: parse_decimal("cutouts", "y_mm", &row.y_mm)?,
            id: row.id,
            cutout_type: row.cutout_type,
            notes: row.notes,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for project database operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    /// Creates a new ProjectRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProjectRepository { pool }
    }

    /// Inserts or replaces a project together with all of its surfaces and
    /// cutouts, atomically.
    ///
    /// Surfaces and cutouts not present in `project` are removed. Selected
    /// materials must already exist in the catalogue. The project name must
    /// be non-blank.
    pub async fn save(&self, project: &Project) -> DbResult<()> {
        debug!(
            id = %project.id,
            surfaces = project.surfaces.len(),
            "Saving project"
        );
        validate_name("name", &project.name).map_err(CoreError::from)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, customer_id, name, project_type, status,
                address, notes, delivery_zone, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (id) DO UPDATE SET
                customer_id = excluded.customer_id,
                name = excluded.name,
                project_type = excluded.project_type,
                status = excluded.status,
                address = excluded.address,
                notes = excluded.notes,
                delivery_zone = excluded.delivery_zone
            "#,
        )
        .bind(&project.id)
        .bind(&project.customer_id)
        .bind(&project.name)
        .bind(project.project_type)
        .bind(project.status)
        .bind(&project.address)
        .bind(&project.notes)
        .bind(project.delivery_zone)
        .bind(project.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM cutouts WHERE surface_id IN (SELECT id FROM surfaces WHERE project_id = ?1)",
        )
        .bind(&project.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM surfaces WHERE project_id = ?1")
            .bind(&project.id)
            .execute(&mut *tx)
            .await?;

        for (position, surface) in project.surfaces.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO surfaces (
                    id, project_id, position, name, surface_type,
                    width_mm, height_mm, enabled, material_id,
                    edge_profile, complexity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&surface.id)
            .bind(&project.id)
            .bind(position as i64)
            .bind(&surface.name)
            .bind(surface.surface_type)
            .bind(surface.width_mm.to_string())
            .bind(surface.height_mm.to_string())
            .bind(surface.enabled)
            .bind(surface.selected_material.as_ref().map(|m| m.id.as_str()))
            .bind(surface.edge_profile)
            .bind(surface.complexity)
            .execute(&mut *tx)
            .await?;

            for (cutout_position, cutout) in surface.cutouts.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO cutouts (
                        id, surface_id, position, cutout_type,
                        width_mm, height_mm, x_mm, y_mm, notes
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(&cutout.id)
                .bind(&surface.id)
                .bind(cutout_position as i64)
                .bind(cutout.cutout_type)
                .bind(cutout.width_mm.to_string())
                .bind(cutout.height_mm.to_string())
                .bind(cutout.x_mm.to_string())
                .bind(cutout.y_mm.to_string())
                .bind(&cutout.notes)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a project with its surfaces (in order), their selected materials
    /// and their cutouts.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Project>> {
        let Some(row) = sqlx::query_as::<_, ProjectRecord>(
            r#"
            SELECT id, customer_id, name, project_type, status,
                   address, notes, delivery_zone, created_at
            FROM projects
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let surfaces = self.load_surfaces(&row.id).await?;

        Ok(Some(Project {
            id: row.id,
            customer_id: row.customer_id,
            name: row.name,
            project_type: row.project_type,
            status: row.status,
            address: row.address,
            notes: row.notes,
            delivery_zone: row.delivery_zone,
            surfaces,
            created_at: row.created_at,
        }))
    }

    /// Lists a customer's projects, oldest first, fully hydrated.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Project>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM projects WHERE customer_id = ?1 ORDER BY created_at, id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(project) = self.get_by_id(&id).await? {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    async fn load_surfaces(&self, project_id: &str) -> DbResult<Vec<Surface>> {
        let rows = sqlx::query_as::<_, SurfaceRecord>(
            r#"
            SELECT id, name, surface_type, width_mm, height_mm, enabled,
                   material_id, edge_profile, complexity
            FROM surfaces
            WHERE project_id = ?1
            ORDER BY position
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut cutouts = self.load_cutouts(project_id).await?;
        let mut materials: HashMap<String, StoneMaterial> = HashMap::new();
        let mut surfaces = Vec::with_capacity(rows.len());

        for row in rows {
            let selected_material = match row.material_id {
                Some(material_id) => Some(self.material(&mut materials, &material_id).await?),
                None => None,
            };

            surfaces.push(Surface {
                width_mm: parse_decimal("surfaces", "width_mm", &row.width_mm)?,
                height_mm: parse_decimal("surfaces", "height_mm", &row.height_mm)?,
                cutouts: cutouts.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
                surface_type: row.surface_type,
                enabled: row.enabled,
                selected_material,
                edge_profile: row.edge_profile,
                complexity: row.complexity,
            });
        }

        Ok(surfaces)
    }

    /// Cutouts of every surface in the project, grouped by surface id, each
    /// group in position order.
    async fn load_cutouts(&self, project_id: &str) -> DbResult<HashMap<String, Vec<Cutout>>> {
        let rows = sqlx::query_as::<_, CutoutRecord>(
            r#"
            SELECT c.id, c.surface_id, c.cutout_type, c.width_mm, c.height_mm,
                   c.x_mm, c.y_mm, c.notes
            FROM cutouts c
            JOIN surfaces s ON s.id = c.surface_id
            WHERE s.project_id = ?1
            ORDER BY c.surface_id, c.position
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<String, Vec<Cutout>> = HashMap::new();
        for row in rows {
            let surface_id = row.surface_id.clone();
            grouped.entry(surface_id).or_default().push(Cutout::try_from(row)?);
        }
        Ok(grouped)
    }

    /// Loads a material once per project, however many surfaces use it.
    async fn material(
        &self,
        cache: &mut HashMap<String, StoneMaterial>,
        material_id: &str,
    ) -> DbResult<StoneMaterial> {
        if let Some(material) = cache.get(material_id) {
            return Ok(material.clone());
        }

        let row = sqlx::query_as::<_, MaterialRecord>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ?1"
        ))
        .bind(material_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Material", material_id))?;

        let material = StoneMaterial::try_from(row)?;
        cache.insert(material_id.to_string(), material.clone());
        Ok(material)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::sample;
    use crate::{Database, DbConfig, DbError};
    use rust_decimal_macros::dec;
    use stoneworks_core::{CoreError, Cutout, CutoutType, DeliveryZone, EdgeProfile};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for material in sample::materials() {
            db.materials().insert(&material).await.unwrap();
        }
        for customer in sample::customers() {
            db.customers().insert(&customer).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_save_and_hydrate() {
        let db = seeded().await;
        let project = sample::project(&sample::materials());
        db.projects().save(&project).await.unwrap();

        let loaded = db.projects().get_by_id(&project.id).await.unwrap().unwrap();
        assert_eq!(loaded, project);

        let surface = &loaded.surfaces[0];
        assert_eq!(
            surface.selected_material.as_ref().unwrap().sell_price.amount(),
            dec!(420)
        );
        assert_eq!(surface.cutouts.len(), 1);
        assert_eq!(surface.cutouts[0].cutout_type, CutoutType::Sink);
    }

    #[tokio::test]
    async fn test_save_replaces_surfaces_and_keeps_order() {
        let db = seeded().await;
        let materials = sample::materials();
        let mut project = sample::project(&materials);
        db.projects().save(&project).await.unwrap();

        let mut splashback = project.surfaces[0].clone();
        splashback.id = "surf-002".to_string();
        splashback.name = "Splashback".to_string();
        splashback.edge_profile = EdgeProfile::Bullnose;
        splashback.selected_material = Some(materials[3].clone());
        splashback.cutouts = vec![
            Cutout {
                id: "cut-002".to_string(),
                cutout_type: CutoutType::Powerpoint,
                width_mm: dec!(80),
                height_mm: dec!(80),
                x_mm: dec!(300),
                y_mm: dec!(200),
                notes: None,
            },
            Cutout {
                id: "cut-003".to_string(),
                cutout_type: CutoutType::Tap,
                width_mm: dec!(35),
                height_mm: dec!(35),
                x_mm: dec!(1500),
                y_mm: dec!(50),
                notes: Some("Mixer tap".to_string()),
            },
        ];
        // Splashback first, then the original countertop without its sink
        project.surfaces[0].cutouts.clear();
        project.surfaces.insert(0, splashback);
        project.delivery_zone = Some(DeliveryZone::Regional);
        db.projects().save(&project).await.unwrap();

        let loaded = db.projects().get_by_id(&project.id).await.unwrap().unwrap();
        assert_eq!(loaded, project);
        let ids: Vec<_> = loaded.surfaces.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["surf-002", "surf-001"]);
        let cutout_ids: Vec<_> = loaded.surfaces[0].cutouts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(cutout_ids, vec!["cut-002", "cut-003"]);
        assert!(loaded.surfaces[1].cutouts.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_material_rolls_back() {
        let db = seeded().await;
        let mut project = sample::project(&sample::materials());
        db.projects().save(&project).await.unwrap();

        let mut bad = project.surfaces[0].clone();
        bad.id = "surf-bad".to_string();
        bad.selected_material.as_mut().unwrap().id = "no-such-stone".to_string();
        project.surfaces.push(bad);
        project.name = "Renamed".to_string();

        let err = db.projects().save(&project).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let loaded = db.projects().get_by_id(&project.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Kitchen Renovation");
        assert_eq!(loaded.surfaces.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_customer() {
        let db = seeded().await;
        let project = sample::project(&sample::materials());
        db.projects().save(&project).await.unwrap();

        assert_eq!(db.projects().list_by_customer("cust-001").await.unwrap().len(), 1);
        assert!(db.projects().list_by_customer("cust-002").await.unwrap().is_empty());
        assert!(db.projects().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_writing() {
        let db = seeded().await;
        let mut project = sample::project(&sample::materials());
        project.name = String::new();

        let err = db.projects().save(&project).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert!(db.projects().get_by_id(&project.id).await.unwrap().is_none());
    }
}
