use chrono::Local;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Service, ServiceInput, ShopConfig, ShopConfigUpdate, Therapist, TherapistInput,
    TherapistStatus,
};
use crate::state::AppState;

pub fn create_service(state: &AppState, input: ServiceInput) -> Result<Service, AppError> {
    input.validate().map_err(AppError::Validation)?;
    let service = Service {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        prices: input.prices,
    };
    queries::save_service(&state.db(), &service)?;
    state.catalog.invalidate_services();
    tracing::info!(service_id = %service.id, name = %service.name, "service created");
    Ok(service)
}

pub fn update_service(state: &AppState, id: &str, input: ServiceInput) -> Result<Service, AppError> {
    input.validate().map_err(AppError::Validation)?;
    {
        let db = state.db();
        if queries::get_service(&db, id)?.is_none() {
            return Err(AppError::NotFound(format!("service {id}")));
        }
    }
    let service = Service {
        id: id.to_string(),
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        prices: input.prices,
    };
    queries::save_service(&state.db(), &service)?;
    state.catalog.invalidate_services();
    tracing::info!(service_id = %service.id, "service updated");
    Ok(service)
}

pub fn create_therapist(state: &AppState, input: TherapistInput) -> Result<Therapist, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("therapist name is required"));
    }
    let therapist = Therapist {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        status: TherapistStatus::Active,
        start_date: input.start_date.unwrap_or_else(|| Local::now().date_naive()),
    };
    queries::create_therapist(&state.db(), &therapist)?;
    state.catalog.invalidate_therapists();
    tracing::info!(therapist_id = %therapist.id, name = %therapist.name, "therapist added");
    Ok(therapist)
}

/// Toggles whether a therapist can take new bookings. Existing bookings are untouched.
pub fn set_therapist_status(
    state: &AppState,
    id: &str,
    status: TherapistStatus,
) -> Result<Therapist, AppError> {
    let updated = queries::set_therapist_status(&state.db(), id, status)?;
    if !updated {
        return Err(AppError::NotFound(format!("therapist {id}")));
    }
    state.catalog.invalidate_therapists();
    tracing::info!(therapist_id = %id, status = status.as_str(), "therapist status changed");
    queries::get_therapist(&state.db(), id)?
        .ok_or_else(|| AppError::NotFound(format!("therapist {id}")))
}

pub fn update_config(state: &AppState, update: ShopConfigUpdate) -> Result<ShopConfig, AppError> {
    let mut config = state.shop_config()?;

    if let Some(rate) = update.commission_rate {
        if !(0.0..=1.0).contains(&rate) {
            return Err(AppError::validation(format!(
                "commission rate must be a fraction between 0 and 1, got {rate}"
            )));
        }
        config.commission_rate = rate;
    }
    if let Some(name) = update.shop_name {
        config.shop_name = name.trim().to_string();
    }
    if let Some(phone) = update.shop_phone {
        config.shop_phone = Some(phone).filter(|p| !p.trim().is_empty());
    }
    if let Some(address) = update.shop_address {
        config.shop_address = Some(address).filter(|a| !a.trim().is_empty());
    }

    queries::save_shop_config(&state.db(), &config)?;
    state.catalog.invalidate_config();
    tracing::info!(commission_rate = config.commission_rate, "shop config updated");
    Ok(config)
}
