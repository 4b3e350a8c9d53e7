pub mod store_dto;

pub use store_dto::{
    CreateUserDto, StoreProfileDto, StoreResponseDto, UpdateStoreDto, UserResponseDto,
};
