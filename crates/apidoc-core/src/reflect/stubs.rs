//! Declarations of PHP's built-in class-likes
//!
//! Only signatures are given. Generic templates follow the PHPStan stubs so
//! that `@extends`/`@implements` arguments line up.

pub(crate) const BUILTIN_STUBS: &str = r#"<?php

/**
 * @template-covariant TKey
 * @template-covariant TValue
 */
interface Traversable {}

/**
 * @template TKey
 * @template TValue
 * @extends Traversable<TKey, TValue>
 */
interface Iterator extends Traversable
{
    /** @return TValue */
    public function current(): mixed;
    public function next(): void;
    /** @return TKey */
    public function key(): mixed;
    public function valid(): bool;
    public function rewind(): void;
}

/**
 * @template TKey
 * @template TValue
 * @extends Traversable<TKey, TValue>
 */
interface IteratorAggregate extends Traversable
{
    /** @return Traversable<TKey, TValue> */
    public function getIterator(): Iterator;
}

/**
 * @template TKey
 * @template TValue
 * @extends Iterator<TKey, TValue>
 */
interface OuterIterator extends Iterator
{
    public function getInnerIterator(): ?Iterator;
}

/**
 * @template TKey
 * @template TValue
 * @extends Iterator<TKey, TValue>
 */
interface SeekableIterator extends Iterator
{
    public function seek(int $offset): void;
}

/**
 * @template TKey
 * @template TValue
 */
interface ArrayAccess
{
    /** @param TKey $offset */
    public function offsetExists(mixed $offset): bool;
    /**
     * @param TKey $offset
     * @return TValue
     */
    public function offsetGet(mixed $offset): mixed;
    /**
     * @param TKey|null $offset
     * @param TValue $value
     */
    public function offsetSet(mixed $offset, mixed $value): void;
    /** @param TKey $offset */
    public function offsetUnset(mixed $offset): void;
}

interface Countable
{
    public function count(): int;
}

interface Stringable
{
    public function __toString(): string;
}

interface JsonSerializable
{
    public function jsonSerialize(): mixed;
}

interface Serializable
{
    public function serialize(): ?string;
    public function unserialize(string $data): void;
}

interface UnitEnum
{
    /** @return list<static> */
    public static function cases(): array;
}

interface BackedEnum extends UnitEnum
{
    public static function from(int|string $value): static;
    public static function tryFrom(int|string $value): ?static;
}

interface Throwable extends Stringable
{
    public function getMessage(): string;
    public function getCode();
    public function getFile(): string;
    public function getLine(): int;
    public function getTrace(): array;
    public function getTraceAsString(): string;
    public function getPrevious(): ?Throwable;
}

class Exception implements Throwable
{
    protected $message = "";
    protected $code = 0;
    protected string $file = "";
    protected int $line = 0;

    public function __construct(string $message = "", int $code = 0, ?Throwable $previous = null) {}
    final public function getMessage(): string {}
    final public function getCode() {}
    final public function getFile(): string {}
    final public function getLine(): int {}
    final public function getTrace(): array {}
    final public function getTraceAsString(): string {}
    final public function getPrevious(): ?Throwable {}
    public function __toString(): string {}
}

class Error implements Throwable
{
    protected $message = "";
    protected $code = 0;
    protected string $file = "";
    protected int $line = 0;

    public function __construct(string $message = "", int $code = 0, ?Throwable $previous = null) {}
    final public function getMessage(): string {}
    final public function getCode() {}
    final public function getFile(): string {}
    final public function getLine(): int {}
    final public function getTrace(): array {}
    final public function getTraceAsString(): string {}
    final public function getPrevious(): ?Throwable {}
    public function __toString(): string {}
}

class ErrorException extends Exception
{
    public function getSeverity(): int {}
}

class TypeError extends Error {}
class ValueError extends Error {}
class ArithmeticError extends Error {}
class DivisionByZeroError extends ArithmeticError {}
class ArgumentCountError extends TypeError {}
class LogicException extends Exception {}
class BadFunctionCallException extends LogicException {}
class BadMethodCallException extends BadFunctionCallException {}
class DomainException extends LogicException {}
class InvalidArgumentException extends LogicException {}
class LengthException extends LogicException {}
class OutOfRangeException extends LogicException {}
class RuntimeException extends Exception {}
class OutOfBoundsException extends RuntimeException {}
class OverflowException extends RuntimeException {}
class RangeException extends RuntimeException {}
class UnderflowException extends RuntimeException {}
class UnexpectedValueException extends RuntimeException {}
class JsonException extends Exception {}

final class Closure
{
    public static function bind(Closure $closure, ?object $newThis, object|string|null $newScope = "static"): ?Closure {}
    public function bindTo(?object $newThis, object|string|null $newScope = "static"): ?Closure {}
    public function call(object $newThis, mixed ...$args): mixed {}
    public static function fromCallable(callable $callback): Closure {}
}

/**
 * @template-covariant TKey
 * @template-covariant TValue
 * @template TSend
 * @template-covariant TReturn
 * @implements Iterator<TKey, TValue>
 */
final class Generator implements Iterator
{
    public function current(): mixed {}
    public function getReturn(): mixed {}
    public function key(): mixed {}
    public function next(): void {}
    public function rewind(): void {}
    public function send(mixed $value): mixed {}
    public function throw(Throwable $exception): mixed {}
    public function valid(): bool {}
}

interface DateTimeInterface
{
    const ATOM = "Y-m-d\TH:i:sP";
    const ISO8601 = "Y-m-d\TH:i:sO";
    const RFC3339 = "Y-m-d\TH:i:sP";

    public function format(string $format): string;
    public function getTimestamp(): int;
    public function getTimezone(): DateTimeZone|false;
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval;
}

class DateTime implements DateTimeInterface
{
    public function __construct(string $datetime = "now", ?DateTimeZone $timezone = null) {}
    public function format(string $format): string {}
    public function getTimestamp(): int {}
    public function getTimezone(): DateTimeZone|false {}
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval {}
    public function modify(string $modifier): DateTime|false {}
}

class DateTimeImmutable implements DateTimeInterface
{
    public function __construct(string $datetime = "now", ?DateTimeZone $timezone = null) {}
    public function format(string $format): string {}
    public function getTimestamp(): int {}
    public function getTimezone(): DateTimeZone|false {}
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval {}
    public function modify(string $modifier): DateTimeImmutable|false {}
}

class DateTimeZone
{
    public function __construct(string $timezone) {}
    public function getName(): string {}
}

class DateInterval
{
    public function __construct(string $duration) {}
    public function format(string $format): string {}
}

/**
 * @template TKey
 * @template TValue
 * @implements IteratorAggregate<TKey, TValue>
 * @implements ArrayAccess<TKey, TValue>
 */
class ArrayObject implements IteratorAggregate, ArrayAccess, Countable, Serializable
{
    /** @param array<TKey, TValue>|object $array */
    public function __construct(array|object $array = [], int $flags = 0, string $iteratorClass = ArrayIterator::class) {}
    public function getIterator(): Iterator {}
    public function offsetExists(mixed $key): bool {}
    public function offsetGet(mixed $key): mixed {}
    public function offsetSet(mixed $key, mixed $value): void {}
    public function offsetUnset(mixed $key): void {}
    public function count(): int {}
    public function serialize(): string {}
    public function unserialize(string $data): void {}
    /** @return array<TKey, TValue> */
    public function getArrayCopy(): array {}
}

/**
 * @template TKey
 * @template TValue
 * @implements SeekableIterator<TKey, TValue>
 * @implements ArrayAccess<TKey, TValue>
 */
class ArrayIterator implements SeekableIterator, ArrayAccess, Countable, Serializable
{
    /** @param array<TKey, TValue> $array */
    public function __construct(array|object $array = [], int $flags = 0) {}
    public function current(): mixed {}
    public function key(): string|int|null {}
    public function next(): void {}
    public function rewind(): void {}
    public function valid(): bool {}
    public function seek(int $offset): void {}
    public function offsetExists(mixed $key): bool {}
    public function offsetGet(mixed $key): mixed {}
    public function offsetSet(mixed $key, mixed $value): void {}
    public function offsetUnset(mixed $key): void {}
    public function count(): int {}
    public function serialize(): string {}
    public function unserialize(string $data): void {}
}

/**
 * @template TObject of object
 * @template TData
 * @implements Iterator<int, TObject>
 * @implements ArrayAccess<TObject, TData>
 */
class SplObjectStorage implements Countable, Iterator, Serializable, ArrayAccess
{
    public function attach(object $object, mixed $info = null): void {}
    public function detach(object $object): void {}
    public function contains(object $object): bool {}
    public function count(int $mode = COUNT_NORMAL): int {}
    public function current(): object {}
    public function key(): int {}
    public function next(): void {}
    public function rewind(): void {}
    public function valid(): bool {}
    public function serialize(): string {}
    public function unserialize(string $data): void {}
    public function offsetExists($object): bool {}
    public function offsetGet($object): mixed {}
    public function offsetSet($object, mixed $info = null): void {}
    public function offsetUnset($object): void {}
}

/**
 * @template TKey of object
 * @template TValue
 * @implements IteratorAggregate<TKey, TValue>
 * @implements ArrayAccess<TKey, TValue>
 */
final class WeakMap implements ArrayAccess, Countable, IteratorAggregate
{
    public function count(): int {}
    public function getIterator(): Iterator {}
    public function offsetExists($object): bool {}
    public function offsetGet($object): mixed {}
    public function offsetSet($object, mixed $value): void {}
    public function offsetUnset($object): void {}
}

/** @template T of object */
final class WeakReference
{
    /**
     * @template TIn of object
     * @param TIn $object
     * @return WeakReference<TIn>
     */
    public static function create(object $object): WeakReference {}
    /** @return ?T */
    public function get(): ?object {}
}

final class Attribute
{
    const TARGET_CLASS = 1;
    const TARGET_FUNCTION = 2;
    const TARGET_METHOD = 4;
    const TARGET_PROPERTY = 8;
    const TARGET_CLASS_CONSTANT = 16;
    const TARGET_PARAMETER = 32;
    const TARGET_ALL = 63;
    const IS_REPEATABLE = 64;

    public function __construct(public int $flags = Attribute::TARGET_ALL) {}
}

class stdClass {}
"#;
