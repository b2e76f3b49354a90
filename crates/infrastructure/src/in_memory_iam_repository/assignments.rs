use super::*;

impl InMemoryIamRepository {
    pub(super) async fn assign_facultad(
        &self,
        rol_id: EntityId,
        name: &FacultadName,
    ) -> AppResult<GraphMember> {
        if !self.roles.read().await.contains_key(&rol_id.value()) {
            return Err(AppError::NotFound(format!("rol {rol_id} does not exist")));
        }
        let member = self
            .facultades
            .read()
            .await
            .values()
            .find(|facultad| facultad.nombre() == name)
            .map(GraphMember::try_from)
            .ok_or_else(|| AppError::NotFound(format!("facultad '{name}' does not exist")))??;

        let mut edges = self.rol_facultades.write().await;
        let names = edges.entry(rol_id.value()).or_default();
        if names.contains(name) {
            return Err(AppError::Conflict(format!(
                "facultad '{name}' is already assigned to rol {rol_id}"
            )));
        }

        names.push(name.clone());
        Ok(member)
    }

    pub(super) async fn unassign_facultad(
        &self,
        rol_id: EntityId,
        name: &FacultadName,
    ) -> AppResult<()> {
        let mut edges = self.rol_facultades.write().await;
        let names = edges.get_mut(&rol_id.value()).ok_or_else(|| {
            AppError::NotFound(format!("rol {rol_id} has no facultades assigned"))
        })?;

        let before = names.len();
        names.retain(|assigned| assigned != name);
        if names.len() == before {
            return Err(AppError::NotFound(format!(
                "facultad '{name}' is not assigned to rol {rol_id}"
            )));
        }

        Ok(())
    }

    pub(super) async fn assign_rol(
        &self,
        perfil_id: EntityId,
        id_rol: IdRol,
    ) -> AppResult<GraphMember> {
        if !self.perfiles.read().await.contains_key(&perfil_id.value()) {
            return Err(AppError::NotFound(format!(
                "perfil {perfil_id} does not exist"
            )));
        }
        let member = self
            .roles
            .read()
            .await
            .values()
            .find(|rol| rol.id_rol() == id_rol)
            .map(GraphMember::try_from)
            .ok_or_else(|| AppError::NotFound(format!("rol #{id_rol} does not exist")))??;

        let mut edges = self.perfil_roles.write().await;
        let id_rols = edges.entry(perfil_id.value()).or_default();
        if id_rols.contains(&id_rol) {
            return Err(AppError::Conflict(format!(
                "rol #{id_rol} is already assigned to perfil {perfil_id}"
            )));
        }

        id_rols.push(id_rol);
        Ok(member)
    }

    pub(super) async fn unassign_rol(&self, perfil_id: EntityId, id_rol: IdRol) -> AppResult<()> {
        let mut edges = self.perfil_roles.write().await;
        let id_rols = edges.get_mut(&perfil_id.value()).ok_or_else(|| {
            AppError::NotFound(format!("perfil {perfil_id} has no roles assigned"))
        })?;

        let before = id_rols.len();
        id_rols.retain(|assigned| *assigned != id_rol);
        if id_rols.len() == before {
            return Err(AppError::NotFound(format!(
                "rol #{id_rol} is not assigned to perfil {perfil_id}"
            )));
        }

        Ok(())
    }
}
