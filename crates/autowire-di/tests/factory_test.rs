mod common;

use autowire_di::*;
use common::*;
use std::sync::Arc;

struct AppConfig;

impl ContainerConfig for AppConfig {
    fn aliases(&self) -> Vec<(String, String)> {
        vec![(String::from("settings"), identifier::<Settings>().to_owned())]
    }

    fn factories(&self) -> Vec<(String, Function)> {
        vec![(
            String::from("settings"),
            Function::new(|_| Ok(settings("configured"))),
        )]
    }

    fn on_after_build_handlers(&self) -> Vec<Hook> {
        let hook: Hook = Arc::new(|value: AnyRef, _: &Container| match value.downcast_ref::<Settings>() {
            Some(s) => Arc::new(settings(&s.greeting.to_uppercase())) as AnyRef,
            None => value,
        });
        vec![hook]
    }
}

#[test]
fn test_factory_applies_config() {
    let container = ContainerFactory::create(&AppConfig);

    // the factory was registered after the alias, so it lives under the concrete key
    let concrete = container.get_as::<Settings>(identifier::<Settings>()).unwrap();
    assert_eq!(concrete.greeting, "CONFIGURED");

    let aliased = container.get_as::<Settings>("settings").unwrap();
    assert!(Arc::ptr_eq(&concrete, &aliased));

    let greeter = container.resolve::<Greeter>().unwrap();
    assert!(Arc::ptr_eq(&greeter.settings, &concrete));
}

#[test]
fn test_builder() {
    let container = Container::build()
        .bind("greeting", "app.greeting")
        .factory("app.greeting", Function::new(|_| Ok(String::from("hi"))))
        .on_after_build(|value, _| match value.downcast_ref::<String>() {
            Some(s) => Arc::new(format!("{}!", s)) as AnyRef,
            None => value,
        })
        .finalize();

    assert!(container.has("greeting"));
    assert_eq!(*container.get_as::<String>("greeting").unwrap(), "hi!");
}
