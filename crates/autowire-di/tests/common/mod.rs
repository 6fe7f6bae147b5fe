#![allow(dead_code)]

use autowire_di::*;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Default)]
pub struct Inner;

impl Injectable for Inner {
    fn reflect() -> Class {
        Class::implicit::<Self>()
    }
}

pub struct Middle {
    pub inner: Ref<Inner>,
}

impl Injectable for Middle {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(Middle { inner: args.get(0)? }))
                .param(Parameter::of::<Inner>("inner")),
        )
    }
}

pub struct Other {
    pub middle: Ref<Middle>,
}

impl Injectable for Other {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(Other { middle: args.get(0)? }))
                .param(Parameter::of::<Middle>("middle")),
        )
    }
}

pub struct ScalarWithArrayAndDefault {
    pub inner: Ref<Inner>,
    pub array: Vec<String>,
    pub default: i32,
}

impl Injectable for ScalarWithArrayAndDefault {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| {
                Ok(ScalarWithArrayAndDefault {
                    inner: args.get(0)?,
                    array: args.value(1)?,
                    default: args.value(2)?,
                })
            })
            .param(Parameter::of::<Inner>("inner"))
            .param(Parameter::typed::<Vec<String>>("array").with_default(Vec::<String>::new()))
            .param(Parameter::untyped("default").with_default(10i32)),
        )
    }
}

/// Needs a `String` the container cannot produce.
pub struct NeedsName {
    pub name: String,
}

impl Injectable for NeedsName {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(NeedsName { name: args.value(0)? }))
                .param(Parameter::typed::<String>("name")),
        )
    }
}

pub struct WrapsNeedsName {
    pub inner: Ref<NeedsName>,
}

impl Injectable for WrapsNeedsName {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(WrapsNeedsName { inner: args.get(0)? }))
                .param(Parameter::of::<NeedsName>("inner")),
        )
    }
}

pub struct Clock {
    pub zone: &'static str,
}

impl Injectable for Clock {
    fn reflect() -> Class {
        Class::singleton::<Self>()
    }
}

impl SingletonProvider for Clock {
    fn instance() -> Ref<Self> {
        static INSTANCE: OnceLock<Ref<Clock>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| Arc::new(Clock { zone: "UTC" }))
            .clone()
    }
}

pub struct Locked;

impl Injectable for Locked {
    fn reflect() -> Class {
        Class::restricted::<Self>()
    }
}

pub struct Ping {
    pub pong: Ref<Pong>,
}

pub struct Pong {
    pub ping: Ref<Ping>,
}

impl Injectable for Ping {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(Ping { pong: args.get(0)? }))
                .param(Parameter::of::<Pong>("pong")),
        )
    }
}

impl Injectable for Pong {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(Pong { ping: args.get(0)? }))
                .param(Parameter::of::<Ping>("ping")),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub greeting: String,
}

pub struct Greeter {
    pub settings: Ref<Settings>,
}

impl Injectable for Greeter {
    fn reflect() -> Class {
        Class::new::<Self>(
            Function::new(|args| Ok(Greeter { settings: args.get(0)? }))
                .param(Parameter::typed::<Settings>("settings")),
        )
        .method(
            "greet",
            Method::new(|this: &Greeter, args| {
                let name = args.value::<String>(0)?;
                Ok(format!("{}, {}!", this.settings.greeting, name))
            })
            .param(Parameter::untyped("name").with_default(String::from("world"))),
        )
        .method(
            "inner_is_shared",
            Method::new(|_: &Greeter, args| {
                let inner = args.get::<Inner>(0)?;
                let container = args.get::<Container>(1)?;
                Ok(Arc::ptr_eq(&inner, &container.resolve::<Inner>()?))
            })
            .param(Parameter::of::<Inner>("inner"))
            .param(Parameter::typed::<Container>("container")),
        )
    }
}

pub fn settings(greeting: &str) -> Settings {
    Settings {
        greeting: greeting.to_owned(),
    }
}
