pub mod usecases;
