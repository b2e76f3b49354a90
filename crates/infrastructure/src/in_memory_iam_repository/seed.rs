use iam_graph_domain::{AuditStamp, FacultadTipo};
use tracing::info;

use super::*;

const DEMO_FACULTADES: [(&str, &str, FacultadTipo); 5] = [
    ("LECTURA", "Consulta de catalogos", FacultadTipo::Simple),
    ("ESCRIBIR", "Alta y cambio de catalogos", FacultadTipo::Simple),
    ("BORRAR", "Baja de registros", FacultadTipo::Sistema),
    ("NOCTURNO", "Operacion fuera de horario", FacultadTipo::Horario),
    ("BOVEDA", "Acceso a boveda", FacultadTipo::Fisica),
];

impl InMemoryIamRepository {
    /// Loads a small demo catalog: Facultades, two Roles and one Perfil.
    pub async fn seed_demo_data(&self, actor: &str) -> AppResult<()> {
        for (nombre, descripcion, tipo) in DEMO_FACULTADES {
            let facultad = Facultad::new(nombre, Some(descripcion.to_owned()), tipo, true)?
                .with_audit(AuditStamp::now(actor));
            self.persist_facultad(facultad).await?;
        }

        let operador = self
            .persist_rol(
                Rol::new(IdRol::new(1)?, "Operador", true)?.with_audit(AuditStamp::now(actor)),
            )
            .await?;
        let auditor = self
            .persist_rol(
                Rol::new(IdRol::new(2)?, "Auditor", true)?.with_audit(AuditStamp::now(actor)),
            )
            .await?;
        let cajas = self
            .persist_perfil(
                Perfil::new("Cajas", Some("Personal de ventanilla".to_owned()), true, false)?
                    .with_audit(AuditStamp::now(actor)),
            )
            .await?;

        for (rol, nombre) in [
            (&operador, "LECTURA"),
            (&operador, "ESCRIBIR"),
            (&auditor, "LECTURA"),
        ] {
            if let Some(id) = rol.id() {
                self.assign_facultad(id, &FacultadName::new(nombre)?).await?;
            }
        }

        if let Some(id) = cajas.id() {
            self.assign_rol(id, operador.id_rol()).await?;
        }

        info!(
            facultades = DEMO_FACULTADES.len(),
            "seeded in-memory IAM store with demo data"
        );
        Ok(())
    }
}
