// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod job_repo_impl;
pub mod product_repo_impl;
pub mod source_repo_impl;
pub mod taxonomy_repo_impl;

pub use job_repo_impl::JobRepositoryImpl;
pub use product_repo_impl::ProductRepositoryImpl;
pub use source_repo_impl::SourceRepositoryImpl;
pub use taxonomy_repo_impl::TaxonomyRepositoryImpl;
