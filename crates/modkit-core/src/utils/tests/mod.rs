
#[cfg(test)]
mod tests {
    use crate::utils::short_type_name;

    struct Plain;
    struct Wrapper<T>(T);

    #[test]
    fn test_short_type_name_strips_module_path() {
        assert_eq!(short_type_name::<Plain>(), "Plain");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn test_short_type_name_keeps_generic_arguments() {
        let name = short_type_name::<Wrapper<u8>>();
        assert!(name.starts_with("Wrapper<"), "unexpected name: {}", name);
        assert!(name.ends_with("u8>"), "unexpected name: {}", name);
    }
}
