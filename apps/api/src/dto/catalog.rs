mod conversions;
mod types;

pub use types::{
    AvailabilityResponse, FacultadResponse, PerfilResponse, RolResponse, SaveFacultadRequest,
    SavePerfilRequest, SaveRolRequest,
};
