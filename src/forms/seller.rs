//! Seller form

use crate::core::entity::{Department, Entity, Seller};
use crate::core::error::ValidationError;
use crate::core::field::SellerField;
use crate::core::service::{PersistenceResult, Repository};
use crate::core::validation::check;
use crate::core::validation::filters::{format_decimal, try_parse_double, try_parse_int};
use crate::core::validation::validators::{decimal, not_blank, present};
use crate::forms::{FormBinding, FormSession, required_text};
use chrono::NaiveDate;
use std::sync::Arc;

/// Raw values of the seller form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerInput {
    /// Id field; blank for a new seller
    pub id: String,
    pub name: String,
    pub email: String,
    /// Picked date, if any
    pub birth_date: Option<NaiveDate>,
    pub base_salary: String,
    /// Selected department; not validated
    pub department: Option<Arc<Department>>,
}

/// Binding between [`SellerInput`] and [`Seller`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SellerBinding;

impl FormBinding for SellerBinding {
    type Entity = Seller;
    type Input = SellerInput;

    fn bind(input: &SellerInput) -> Result<Seller, ValidationError> {
        let mut errors = ValidationError::new();

        required_text(&mut errors, SellerField::Name, &input.name);
        required_text(&mut errors, SellerField::Email, &input.email);

        if let Err(message) = present(input.birth_date.as_ref()) {
            errors.add_error(SellerField::BirthDate, message);
        }

        check(
            &mut errors,
            SellerField::BaseSalary,
            &input.base_salary,
            &[&not_blank(), &decimal()],
        );

        let base_salary = try_parse_double(&input.base_salary);
        let (Some(birth_date), Some(base_salary)) = (input.birth_date, base_salary) else {
            return Err(errors);
        };

        let seller = Seller::new(
            input.name.trim(),
            input.email.trim(),
            birth_date,
            base_salary,
            input.department.clone(),
        );
        let seller = match try_parse_int(&input.id) {
            Some(id) => seller.with_id(id),
            None => seller,
        };
        errors.into_result(seller)
    }

    fn input_for(seller: &Seller) -> SellerInput {
        SellerInput {
            id: seller.id().map(|id| id.to_string()).unwrap_or_default(),
            name: seller.name.clone(),
            email: seller.email.clone(),
            birth_date: Some(seller.birth_date),
            base_salary: format_decimal(seller.base_salary),
            department: seller.department.clone(),
        }
    }
}

/// Editing session of one seller
pub type SellerForm = FormSession<SellerBinding>;

/// Departments offered by the seller form and the one preselected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentChoices {
    /// All departments ordered by name
    pub departments: Vec<Arc<Department>>,
    /// The seller's department when it is listed, else the first one
    pub selected: Option<Arc<Department>>,
}

impl FormSession<SellerBinding> {
    /// Load the department list for the seller being edited
    pub async fn load_department_choices<R>(&self, departments: &R) -> PersistenceResult<DepartmentChoices>
    where
        R: Repository<Department> + ?Sized,
    {
        let departments: Vec<Arc<Department>> = departments
            .find_all()
            .await?
            .into_iter()
            .map(Arc::new)
            .collect();

        let current = self.entity().department_id();
        let selected = current
            .and_then(|id| departments.iter().find(|d| d.id() == Some(id)))
            .or_else(|| departments.first())
            .cloned();

        Ok(DepartmentChoices {
            departments,
            selected,
        })
    }
}
