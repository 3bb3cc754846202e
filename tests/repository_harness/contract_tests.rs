//! Macro-generated test suite for the repository contract.
//!
//! The `repository_contract_tests!` macro generates a test module that
//! validates a `(departments, sellers)` repository pair sharing one store:
//! CRUD on both entity types, ordering, join demultiplexing and the
//! foreign-key behavior between sellers and departments.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod repository_harness;
//!
//! use repository_harness::*;
//! use registry::storage::InMemoryStore;
//!
//! repository_contract_tests!({
//!     let store = InMemoryStore::new();
//!     (store.departments(), store.sellers())
//! });
//! ```

/// Generate a full repository conformance test suite.
///
/// `$factory` must evaluate to a tuple `(D, S)` where `D: Repository<Department>`
/// and `S: SellerRepository` operate on the same, empty store. It is
/// re-evaluated for each test to ensure isolation.
macro_rules! repository_contract_tests {
    ($factory:expr) => {
        mod repository_contract_tests {
            use super::*;
            use registry::core::entity::{Department, Entity, Seller};
            use registry::core::service::{Repository, SellerRepository};
            use std::sync::Arc;

            async fn department(
                departments: &impl Repository<Department>,
                name: &str,
            ) -> Department {
                let mut department = Department::new(name);
                departments.insert(&mut department).await.unwrap();
                department
            }

            async fn seller(sellers: &impl SellerRepository, name: &str, dep: &Department) -> Seller {
                let mut seller = seller_in(name, dep);
                sellers.insert(&mut seller).await.unwrap();
                seller
            }

            // ==================================================================
            // Departments: insert & find
            // ==================================================================

            #[tokio::test]
            async fn test_department_insert_assigns_id() {
                init_tracing();
                let (departments, _sellers) = $factory;

                let mut it = Department::new("IT");
                departments.insert(&mut it).await.unwrap();
                let id = it.id().expect("insert should assign an id");

                let found = departments.find_by_id(id).await.unwrap().unwrap();
                assert_eq!(found.id(), Some(id));
                assert_eq!(found.name, "IT");
            }

            #[tokio::test]
            async fn test_department_insert_assigns_distinct_ids() {
                let (departments, _sellers) = $factory;
                let a = department(&departments, "A").await;
                let b = department(&departments, "B").await;
                assert_ne!(a.id(), b.id());
            }

            #[tokio::test]
            async fn test_department_insert_with_id_fails() {
                let (departments, _sellers) = $factory;
                let mut books = Department::with_id(7, "Books");

                assert!(departments.insert(&mut books).await.is_err());
                assert_eq!(books.id(), Some(7));
                assert!(departments.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_department_find_nonexistent() {
                let (departments, _sellers) = $factory;
                assert!(departments.find_by_id(999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_department_find_all_empty() {
                let (departments, _sellers) = $factory;
                assert!(departments.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_department_find_all_ordered_by_name() {
                let (departments, _sellers) = $factory;
                for name in ["Marketing", "Books", "Electronics", "Computers"] {
                    department(&departments, name).await;
                }

                let names: Vec<String> = departments
                    .find_all()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|d| d.name)
                    .collect();
                assert_eq!(names, vec!["Books", "Computers", "Electronics", "Marketing"]);
            }

            // ==================================================================
            // Departments: update
            // ==================================================================

            #[tokio::test]
            async fn test_department_update_existing() {
                let (departments, _sellers) = $factory;
                let mut dep = department(&departments, "IT").await;

                dep.name = "Information Technology".to_string();
                departments.update(&dep).await.unwrap();

                let found = departments.find_by_id(dep.id().unwrap()).await.unwrap().unwrap();
                assert_eq!(found.name, "Information Technology");
            }

            #[tokio::test]
            async fn test_department_update_nonexistent_is_silent() {
                let (departments, _sellers) = $factory;
                let ghost = Department::with_id(404, "Ghost");

                departments
                    .update(&ghost)
                    .await
                    .expect("update of a missing id reports no error");
                assert!(departments.find_by_id(404).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_department_update_without_id_fails() {
                let (departments, _sellers) = $factory;
                assert!(departments.update(&Department::new("Draft")).await.is_err());
            }

            // ==================================================================
            // Departments: delete
            // ==================================================================

            #[tokio::test]
            async fn test_department_delete_existing() {
                let (departments, _sellers) = $factory;
                let keep = department(&departments, "Keep").await;
                let gone = department(&departments, "Gone").await;

                departments.delete_by_id(gone.id().unwrap()).await.unwrap();

                assert!(departments.find_by_id(gone.id().unwrap()).await.unwrap().is_none());
                assert!(departments.find_by_id(keep.id().unwrap()).await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_department_delete_nonexistent_fails() {
                let (departments, _sellers) = $factory;
                let err = departments.delete_by_id(12345).await.unwrap_err();
                assert_eq!(err.message(), "Id does not exist!");
            }

            #[tokio::test]
            async fn test_department_delete_referenced_fails() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                seller(&sellers, "Bob", &it).await;

                assert!(departments.delete_by_id(it.id().unwrap()).await.is_err());
                assert!(departments.find_by_id(it.id().unwrap()).await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_department_save_or_update() {
                let (departments, _sellers) = $factory;
                let mut dep = Department::new("IT");

                departments.save_or_update(&mut dep).await.unwrap();
                let id = dep.id().unwrap();

                dep.name = "Tech".to_string();
                departments.save_or_update(&mut dep).await.unwrap();

                assert_eq!(dep.id(), Some(id));
                let all = departments.find_all().await.unwrap();
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].name, "Tech");
            }

            // ==================================================================
            // Sellers: insert & find
            // ==================================================================

            #[tokio::test]
            async fn test_seller_round_trip() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;

                let mut bob = Seller::new(
                    "Bob",
                    "b@x.com",
                    date(1990, 1, 1),
                    2000.0,
                    Some(Arc::new(it.clone())),
                );
                sellers.insert(&mut bob).await.unwrap();
                let id = bob.id().expect("insert should assign an id");

                let found = sellers.find_by_id(id).await.unwrap().unwrap();
                assert_eq!(found.id(), Some(id));
                assert_eq!(found.name, "Bob");
                assert_eq!(found.email, "b@x.com");
                assert_eq!(found.birth_date, date(1990, 1, 1));
                assert!((found.base_salary - 2000.0).abs() < f64::EPSILON);
                assert_eq!(found.department_id(), it.id());
                assert_eq!(found.department.as_ref().unwrap().name, "IT");
            }

            #[tokio::test]
            async fn test_seller_fractional_salary() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let mut ann = seller_in("Ann", &it);
                ann.base_salary = 3512.75;
                sellers.insert(&mut ann).await.unwrap();

                let found = sellers.find_by_id(ann.id().unwrap()).await.unwrap().unwrap();
                assert!((found.base_salary - 3512.75).abs() < 1e-9);
            }

            #[tokio::test]
            async fn test_seller_insert_with_id_fails() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let mut bob = seller_in("Bob", &it).with_id(9);

                assert!(sellers.insert(&mut bob).await.is_err());
                assert_eq!(bob.id(), Some(9));
                assert!(sellers.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_seller_find_nonexistent() {
                let (_departments, sellers) = $factory;
                assert!(sellers.find_by_id(999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_seller_insert_without_department_fails() {
                let (_departments, sellers) = $factory;
                let mut orphan = Seller::new("Orphan", "o@x.com", date(1980, 5, 5), 1.0, None);

                assert!(sellers.insert(&mut orphan).await.is_err());
                assert_eq!(orphan.id(), None);
                assert!(sellers.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_seller_insert_with_missing_department_fails() {
                let (_departments, sellers) = $factory;
                let mut seller = seller_in("Bob", &Department::with_id(777, "Ghost"));
                assert!(sellers.insert(&mut seller).await.is_err());
                assert_eq!(seller.id(), None);
            }

            // ==================================================================
            // Sellers: listings and join demultiplexing
            // ==================================================================

            #[tokio::test]
            async fn test_seller_find_all_ordered_by_name() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let books = department(&departments, "Books").await;

                seller(&sellers, "Maria", &it).await;
                seller(&sellers, "Alex", &books).await;
                seller(&sellers, "Zoe", &books).await;
                seller(&sellers, "Carl", &it).await;

                let names: Vec<String> = sellers
                    .find_all()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|s| s.name)
                    .collect();
                assert_eq!(names, vec!["Alex", "Carl", "Maria", "Zoe"]);
            }

            #[tokio::test]
            async fn test_seller_find_all_shares_department_instances() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let books = department(&departments, "Books").await;

                seller(&sellers, "Alex", &it).await;
                seller(&sellers, "Bea", &books).await;
                seller(&sellers, "Carl", &it).await;

                let all = sellers.find_all().await.unwrap();
                assert_eq!(all.len(), 3);
                let alex = all[0].department.as_ref().unwrap();
                let bea = all[1].department.as_ref().unwrap();
                let carl = all[2].department.as_ref().unwrap();

                assert!(Arc::ptr_eq(alex, carl), "same department id, same instance");
                assert!(!Arc::ptr_eq(alex, bea));
                assert_eq!(bea.name, "Books");
            }

            #[tokio::test]
            async fn test_department_instances_not_shared_across_calls() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                seller(&sellers, "Alex", &it).await;

                let first = sellers.find_all().await.unwrap();
                let second = sellers.find_all().await.unwrap();
                assert!(!Arc::ptr_eq(
                    first[0].department.as_ref().unwrap(),
                    second[0].department.as_ref().unwrap()
                ));
            }

            #[tokio::test]
            async fn test_find_by_department_filters_and_shares() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let books = department(&departments, "Books").await;

                seller(&sellers, "Zed", &it).await;
                seller(&sellers, "Bea", &books).await;
                seller(&sellers, "Amy", &it).await;

                let found = sellers.find_by_department(&it).await.unwrap();
                let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["Amy", "Zed"]);
                assert!(found.iter().all(|s| s.department_id() == it.id()));
                assert!(Arc::ptr_eq(
                    found[0].department.as_ref().unwrap(),
                    found[1].department.as_ref().unwrap()
                ));
            }

            #[tokio::test]
            async fn test_find_by_department_without_sellers() {
                let (departments, sellers) = $factory;
                let empty = department(&departments, "Empty").await;
                assert!(sellers.find_by_department(&empty).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_by_unsaved_department() {
                let (_departments, sellers) = $factory;
                let draft = Department::new("Draft");
                assert!(sellers.find_by_department(&draft).await.unwrap().is_empty());
            }

            // ==================================================================
            // Sellers: update & delete
            // ==================================================================

            #[tokio::test]
            async fn test_seller_update_moves_department() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let books = department(&departments, "Books").await;
                let mut bob = seller(&sellers, "Bob", &it).await;

                bob.email = "bob@books.com".to_string();
                bob.base_salary = 2500.0;
                bob.department = Some(Arc::new(books.clone()));
                sellers.update(&bob).await.unwrap();

                let found = sellers.find_by_id(bob.id().unwrap()).await.unwrap().unwrap();
                assert_eq!(found.email, "bob@books.com");
                assert_eq!(found.department_id(), books.id());
                assert!(sellers.find_by_department(&it).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_seller_update_nonexistent_is_silent() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let ghost = seller_in("Ghost", &it).with_id(404);

                sellers
                    .update(&ghost)
                    .await
                    .expect("update of a missing id reports no error");
                assert!(sellers.find_by_id(404).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_seller_delete() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let bob = seller(&sellers, "Bob", &it).await;
                let ann = seller(&sellers, "Ann", &it).await;

                sellers.delete_by_id(bob.id().unwrap()).await.unwrap();

                assert!(sellers.find_by_id(bob.id().unwrap()).await.unwrap().is_none());
                assert!(sellers.find_by_id(ann.id().unwrap()).await.unwrap().is_some());
                assert!(sellers.delete_by_id(bob.id().unwrap()).await.is_err());
            }

            #[tokio::test]
            async fn test_department_delete_after_sellers_removed() {
                let (departments, sellers) = $factory;
                let it = department(&departments, "IT").await;
                let bob = seller(&sellers, "Bob", &it).await;

                sellers.delete_by_id(bob.id().unwrap()).await.unwrap();
                departments.delete_by_id(it.id().unwrap()).await.unwrap();
                assert!(departments.find_all().await.unwrap().is_empty());
            }

            // ==================================================================
            // Scenario
            // ==================================================================

            #[tokio::test]
            async fn test_it_department_with_bob() {
                let (departments, sellers) = $factory;

                let mut it = Department::new("IT");
                departments.insert(&mut it).await.unwrap();
                assert_eq!(it.id(), Some(1));

                let mut bob = Seller::new(
                    "Bob",
                    "b@x.com",
                    date(1990, 1, 1),
                    2000.0,
                    Some(Arc::new(Department::with_id(1, "IT"))),
                );
                sellers.insert(&mut bob).await.unwrap();
                assert_eq!(bob.id(), Some(1));

                let found = sellers
                    .find_by_department(&Department::with_id(1, ""))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].id(), Some(1));
                assert_eq!(
                    found[0].department.as_deref(),
                    Some(&Department::with_id(1, "IT"))
                );
            }
        }
    };
}
